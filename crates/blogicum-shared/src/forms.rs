//! Submitted forms and their field validation.
//!
//! `validate` returns every problem at once, one message per failing field,
//! prefixed with the field name.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Longest accepted post title.
pub const MAX_TITLE_LENGTH: usize = 256;
/// Longest accepted username.
pub const MAX_USERNAME_LENGTH: usize = 150;
/// Shortest accepted password.
pub const MIN_PASSWORD_LENGTH: usize = 8;

const REQUIRED: &str = "This field is required.";

fn default_published() -> bool {
    true
}

/// Post creation and edit form. Any author field in the payload is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub pub_date: Option<DateTime<Utc>>,
    #[serde(default = "default_published")]
    pub is_published: bool,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub location_id: Option<i64>,
    #[serde(default)]
    pub image: Option<String>,
}

impl PostForm {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.title.trim().is_empty() {
            errors.push(format!("title: {REQUIRED}"));
        } else if self.title.chars().count() > MAX_TITLE_LENGTH {
            errors.push(format!(
                "title: Ensure this value has at most {MAX_TITLE_LENGTH} characters."
            ));
        }
        if self.text.trim().is_empty() {
            errors.push(format!("text: {REQUIRED}"));
        }
        if self.pub_date.is_none() {
            errors.push(format!("pub_date: {REQUIRED}"));
        }
        if self.category_id.is_none() {
            errors.push(format!("category_id: {REQUIRED}"));
        }

        errors
    }
}

/// Comment creation and edit form. Post and author come from the request context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentForm {
    #[serde(default)]
    pub text: String,
}

impl CommentForm {
    pub fn validate(&self) -> Vec<String> {
        if self.text.trim().is_empty() {
            vec![format!("text: {REQUIRED}")]
        } else {
            Vec::new()
        }
    }
}

/// Account fields a user edits on their own profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
}

impl ProfileForm {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        check_username(&self.username, &mut errors);
        check_email(&self.email, &mut errors);
        errors
    }
}

/// Sign-up form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl RegistrationForm {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        check_username(&self.username, &mut errors);
        check_email(&self.email, &mut errors);

        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            errors.push(format!(
                "password: This password is too short. It must contain at least {MIN_PASSWORD_LENGTH} characters."
            ));
        } else if self.password.chars().all(|c| c.is_ascii_digit()) {
            errors.push("password: This password is entirely numeric.".to_string());
        }

        errors
    }
}

fn check_username(username: &str, errors: &mut Vec<String>) {
    if username.is_empty() {
        errors.push(format!("username: {REQUIRED}"));
    } else if username.chars().count() > MAX_USERNAME_LENGTH {
        errors.push(format!(
            "username: Ensure this value has at most {MAX_USERNAME_LENGTH} characters."
        ));
    } else if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        errors.push(
            "username: Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters."
                .to_string(),
        );
    }
}

fn check_email(email: &str, errors: &mut Vec<String>) {
    // Blank is allowed.
    if email.is_empty() {
        return;
    }
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid {
        errors.push("email: Enter a valid email address.".to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_form_reports_every_missing_field() {
        let form: PostForm = serde_json::from_str("{}").unwrap();
        let errors = form.validate();

        assert!(form.is_published);
        assert_eq!(errors.len(), 4);
        assert!(errors.iter().any(|e| e.starts_with("pub_date")));
        assert!(errors.iter().any(|e| e.starts_with("category_id")));
    }

    #[test]
    fn test_post_form_ignores_author_field() {
        let form: PostForm = serde_json::from_str(
            r#"{"title":"T","text":"B","pub_date":"2024-01-01T10:00:00Z","category_id":1,"author_id":99}"#,
        )
        .unwrap();
        assert!(form.validate().is_empty());
    }

    #[test]
    fn test_title_length_limit() {
        let form = PostForm {
            title: "x".repeat(MAX_TITLE_LENGTH + 1),
            text: "B".into(),
            pub_date: Some(Utc::now()),
            is_published: true,
            category_id: Some(1),
            location_id: None,
            image: None,
        };
        assert_eq!(form.validate().len(), 1);
    }

    #[test]
    fn test_blank_comment_is_rejected() {
        assert_eq!(CommentForm { text: "   ".into() }.validate().len(), 1);
        assert!(CommentForm { text: "ok".into() }.validate().is_empty());
    }

    #[test]
    fn test_registration_password_rules() {
        let form = |password: &str| RegistrationForm {
            username: "leo".into(),
            email: "leo@example.com".into(),
            password: password.into(),
        };
        assert_eq!(form("short").validate().len(), 1);
        assert_eq!(form("1234567890").validate().len(), 1);
        assert!(form("long enough").validate().is_empty());
    }

    #[test]
    fn test_profile_username_and_email_rules() {
        let form = ProfileForm {
            username: "bad name".into(),
            first_name: String::new(),
            last_name: String::new(),
            email: "nope".into(),
        };
        assert_eq!(form.validate().len(), 2);

        let blank_email = ProfileForm {
            username: "leo.t+1".into(),
            email: String::new(),
            ..form
        };
        assert!(blank_email.validate().is_empty());
    }

    #[test]
    fn test_email_needs_local_part_and_dotted_domain() {
        let mut errors = Vec::new();
        for email in ["@blogicum.not", "leo@localhost", "leo"] {
            check_email(email, &mut errors);
        }
        assert_eq!(errors.len(), 3);

        errors.clear();
        check_email("leo@blogicum.not", &mut errors);
        check_email("", &mut errors);
        assert!(errors.is_empty());
    }
}
