#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::{TimeDelta, Utc};
    use sea_orm::{
        DatabaseBackend, EntityTrait, JoinType, MockDatabase, QueryFilter, QuerySelect,
        QueryTrait, RelationTrait, Value,
    };

    use crate::database::entity::{category, post};
    use crate::database::postgres_repo::{
        PostgresCategoryRepository, PostgresPostRepository, filter_condition,
        visibility_condition,
    };
    use blogicum_core::domain::Post;
    use blogicum_core::pagination::{PageNumber, PageRequest};
    use blogicum_core::ports::{BaseRepository, CategoryRepository, PostRepository};
    use blogicum_core::visibility::{PostFilter, Viewer, Visibility};

    fn post_model(id: i64) -> post::Model {
        let now = Utc::now();
        post::Model {
            id,
            author_id: 3,
            category_id: Some(1),
            location_id: None,
            title: "Test Post".to_owned(),
            text: "Content".to_owned(),
            pub_date: (now - TimeDelta::hours(1)).into(),
            is_published: true,
            image: None,
            created_at: now.into(),
        }
    }

    #[tokio::test]
    async fn test_find_post_by_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![post_model(5)]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result: Option<Post> = repo.find_by_id(5).await.unwrap();

        let post = result.unwrap();
        assert_eq!(post.title, "Test Post");
        assert_eq!(post.id, 5);
        assert_eq!(post.category_id, Some(1));
    }

    #[tokio::test]
    async fn test_find_published_category_by_slug() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![category::Model {
                id: 1,
                title: "Travel".to_owned(),
                description: "Trips".to_owned(),
                slug: "travel".to_owned(),
                is_published: true,
                created_at: Utc::now().into(),
            }]])
            .into_connection();

        let repo = PostgresCategoryRepository::new(db);
        let category = repo.find_published_by_slug("travel").await.unwrap().unwrap();

        assert_eq!(category.slug, "travel");
    }

    #[tokio::test]
    async fn test_list_posts_reads_count_and_annotated_rows() {
        let model = post_model(5);
        let row = BTreeMap::from([
            ("id", Value::from(model.id)),
            ("author_id", Value::from(model.author_id)),
            ("category_id", Value::from(model.category_id)),
            ("location_id", Value::from(model.location_id)),
            ("title", Value::from(model.title.clone())),
            ("text", Value::from(model.text.clone())),
            ("pub_date", Value::from(model.pub_date)),
            ("is_published", Value::from(model.is_published)),
            ("image", Value::from(model.image.clone())),
            ("created_at", Value::from(model.created_at)),
            ("comment_count", Value::from(4i64)),
        ]);
        let count = BTreeMap::from([("num_items", Value::from(11i64))]);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![count]])
            .append_query_results(vec![vec![row]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let page = repo
            .list(
                PostFilter::feed(Utc::now()),
                PageRequest::new(PageNumber::Number(2), 10),
            )
            .await
            .unwrap();

        assert_eq!(page.total_items, 11);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.number, 2);
        assert_eq!(page.items[0].comment_count, 4);
        assert_eq!(page.items[0].post.id, 5);
    }

    #[test]
    fn test_detail_condition_adds_author_alternative() {
        let visibility = Visibility::for_detail(Viewer::User(7), Utc::now());
        let sql = post::Entity::find()
            .join(JoinType::LeftJoin, post::Relation::Category.def())
            .filter(visibility_condition(visibility))
            .build(DatabaseBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#""categories"."is_published" = TRUE"#));
        assert!(sql.contains(r#""posts"."pub_date" <="#));
        assert!(sql.contains(r#" OR "posts"."author_id" = 7"#));
    }

    #[test]
    fn test_foreign_profile_condition_has_no_gate() {
        let filter = PostFilter::profile(3, Viewer::Anonymous);
        let sql = post::Entity::find()
            .filter(filter_condition(filter))
            .build(DatabaseBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#""posts"."is_published" = TRUE"#));
        assert!(sql.contains(r#""posts"."author_id" = 3"#));
        assert!(!sql.contains(r#""posts"."pub_date" <="#));
        assert!(!sql.contains(r#""categories"."is_published""#));
    }
}
