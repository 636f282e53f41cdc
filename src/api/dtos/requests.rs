use serde::Deserialize;

use crate::domain::models::user::{NewUser, UserPatch};
use crate::error::AppError;

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize, Default)]
pub struct LoginQuery {
    pub error: Option<String>,
    pub logout: Option<String>,
}

#[derive(Deserialize)]
pub struct CsrfForm {
    #[serde(default)]
    pub csrf_token: String,
}

#[derive(Deserialize)]
pub struct RegistrationForm {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub email: String,
}

impl From<RegistrationForm> for NewUser {
    fn from(form: RegistrationForm) -> Self {
        NewUser {
            username: form.username,
            password: form.password,
            name: form.name,
            surname: form.surname,
            email: form.email,
            role_ids: Vec::new(),
        }
    }
}

#[derive(Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub csrf_token: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl From<ProfileForm> for UserPatch {
    fn from(form: ProfileForm) -> Self {
        UserPatch {
            name: form.name,
            surname: form.surname,
            email: form.email,
            password: Some(form.password),
            role_ids: None,
        }
    }
}

#[derive(Deserialize)]
pub struct SelfUpdateForm {
    pub id: i64,
    #[serde(default)]
    pub csrf_token: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl From<SelfUpdateForm> for UserPatch {
    fn from(form: SelfUpdateForm) -> Self {
        UserPatch {
            name: form.name,
            surname: form.surname,
            email: form.email,
            password: Some(form.password),
            role_ids: None,
        }
    }
}

/// Raw url-encoded pairs. Checkbox groups submit the same key several
/// times, which a plain struct cannot capture.
pub struct FormPairs(pub Vec<(String, String)>);

impl FormPairs {
    pub fn get(&self, key: &str) -> String {
        self.0.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .unwrap_or_default()
    }

    pub fn get_all_ids(&self, key: &str) -> Result<Vec<i64>, AppError> {
        self.0.iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| {
                v.trim().parse::<i64>()
                    .map_err(|_| AppError::Validation(format!("Invalid role id '{}'", v)))
            })
            .collect()
    }
}

pub struct AddUserForm {
    pub csrf_token: String,
    pub user: NewUser,
}

impl TryFrom<FormPairs> for AddUserForm {
    type Error = AppError;

    fn try_from(pairs: FormPairs) -> Result<Self, Self::Error> {
        Ok(Self {
            csrf_token: pairs.get("csrf_token"),
            user: NewUser {
                username: pairs.get("username"),
                password: pairs.get("password"),
                name: pairs.get("name"),
                surname: pairs.get("surname"),
                email: pairs.get("email"),
                role_ids: pairs.get_all_ids("role_ids")?,
            },
        })
    }
}

pub struct AdminEditForm {
    pub csrf_token: String,
    pub patch: UserPatch,
}

impl TryFrom<FormPairs> for AdminEditForm {
    type Error = AppError;

    fn try_from(pairs: FormPairs) -> Result<Self, Self::Error> {
        Ok(Self {
            csrf_token: pairs.get("csrf_token"),
            patch: UserPatch {
                name: pairs.get("name"),
                surname: pairs.get("surname"),
                email: pairs.get("email"),
                password: Some(pairs.get("password")),
                role_ids: Some(pairs.get_all_ids("role_ids")?),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> FormPairs {
        FormPairs(raw.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
    }

    #[test]
    fn test_add_user_form_collects_repeated_role_ids() {
        let form = AddUserForm::try_from(pairs(&[
            ("csrf_token", "abc"),
            ("username", "bob"),
            ("password", "secret"),
            ("role_ids", "1"),
            ("role_ids", "2"),
        ])).unwrap();

        assert_eq!(form.csrf_token, "abc");
        assert_eq!(form.user.username, "bob");
        assert_eq!(form.user.role_ids, vec![1, 2]);
        assert_eq!(form.user.email, "");
    }

    #[test]
    fn test_non_numeric_role_id_is_rejected() {
        let result = AdminEditForm::try_from(pairs(&[("role_ids", "admin")]));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
