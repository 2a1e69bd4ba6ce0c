//! Admin account management: draft validation, password generation and the
//! admin roster

use crate::error::{FieldErrors, ProtocolError, ProtocolResult};
use punter_types::{Admin, NewAdmin};
use rand::Rng;
use rand::seq::SliceRandom;
use regex::Regex;
use std::sync::LazyLock;

/// Symbols a generated password ends with
pub const PASSWORD_SYMBOLS: [char; 7] = ['!', '@', '#', '$', '%', '&', '*'];

static EMAIL_RE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").ok());

/// Generate an initial password from an admin's names.
///
/// Upper-cased first initial, lower-cased last initial, a number in
/// `100..=999` and one of [`PASSWORD_SYMBOLS`]. Returns `None` when either
/// name is empty.
pub fn generate_password<R: Rng + ?Sized>(first: &str, last: &str, rng: &mut R) -> Option<String> {
    let first = first.chars().next()?;
    let last = last.chars().next()?;
    let digits = rng.gen_range(100..=999);
    let symbol = *PASSWORD_SYMBOLS.choose(rng)?;

    let mut password: String = first.to_uppercase().collect();
    password.extend(last.to_lowercase());
    password.push_str(&digits.to_string());
    password.push(symbol);
    Some(password)
}

fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.as_ref().is_some_and(|re| re.is_match(email))
}

/// Form state of a new admin account
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminDraft {
    first_name: String,
    last_name: String,
    email: String,
    password: String,
}

impl AdminDraft {
    /// Empty draft
    pub fn new() -> Self {
        Self::default()
    }

    /// First name as typed
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Last name as typed
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Email as typed
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Current password, generated or manually edited
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Set the first name, regenerating the password when both names are set
    pub fn set_first_name<R: Rng + ?Sized>(&mut self, name: impl Into<String>, rng: &mut R) {
        self.first_name = name.into();
        self.regenerate(rng);
    }

    /// Set the last name, regenerating the password when both names are set
    pub fn set_last_name<R: Rng + ?Sized>(&mut self, name: impl Into<String>, rng: &mut R) {
        self.last_name = name.into();
        self.regenerate(rng);
    }

    /// Set the email
    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    /// Override the password; kept until a name changes again
    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = password.into();
    }

    fn regenerate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if let Some(password) = generate_password(&self.first_name, &self.last_name, rng) {
            self.password = password;
        }
    }

    /// Check the form and build the signup payload.
    ///
    /// Names are required after trimming; the email is required and must
    /// look like `x@y.z`. Every failing field is reported at once.
    pub fn validate(&self) -> ProtocolResult<NewAdmin> {
        let mut errors = FieldErrors::new();
        if self.first_name.trim().is_empty() {
            errors.insert("firstName", "First name is required");
        }
        if self.last_name.trim().is_empty() {
            errors.insert("lastName", "Last name is required");
        }
        if self.email.trim().is_empty() {
            errors.insert("email", "Email is required");
        } else if !is_valid_email(&self.email) {
            errors.insert("email", "Email is invalid");
        }

        if !errors.is_empty() {
            return Err(ProtocolError::Validation(errors));
        }

        Ok(NewAdmin {
            firstname: self.first_name.clone(),
            lastname: self.last_name.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
        })
    }
}

/// Operator answer to the delete prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// The operator confirmed
    Confirmed,
    /// The operator declined or was never asked
    Declined,
}

impl From<bool> for Confirmation {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Self::Confirmed
        } else {
            Self::Declined
        }
    }
}

/// Confirmed delete, produced by [`AdminRoster::prepare_delete`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteAdmin {
    /// Admin id
    pub id: String,
}

/// Loaded admin accounts
#[derive(Debug, Clone, Default)]
pub struct AdminRoster {
    admins: Vec<Admin>,
}

impl AdminRoster {
    /// Roster over admins freshly loaded from the backend
    pub const fn new(admins: Vec<Admin>) -> Self {
        Self { admins }
    }

    /// Admins in backend order
    pub fn admins(&self) -> &[Admin] {
        &self.admins
    }

    /// Look an admin up by id
    pub fn get(&self, id: &str) -> Option<&Admin> {
        self.admins.iter().find(|admin| admin.id == id)
    }

    /// Append an admin the backend has created
    pub fn insert(&mut self, admin: Admin) {
        self.admins.push(admin);
    }

    /// Replace the roster after a reload
    pub fn replace(&mut self, admins: Vec<Admin>) {
        self.admins = admins;
    }

    /// Check a delete request before it reaches the backend
    pub fn prepare_delete(&self, id: &str, confirmation: Confirmation) -> ProtocolResult<DeleteAdmin> {
        if self.get(id).is_none() {
            return Err(ProtocolError::not_found("admin", id));
        }
        if confirmation != Confirmation::Confirmed {
            return Err(ProtocolError::Unconfirmed { id: id.to_string() });
        }
        Ok(DeleteAdmin { id: id.to_string() })
    }

    /// Drop an admin the backend has deleted
    pub fn apply_delete(&mut self, command: &DeleteAdmin) -> Option<Admin> {
        let index = self.admins.iter().position(|admin| admin.id == command.id)?;
        Some(self.admins.remove(index))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rstest::rstest;

    fn admin(id: &str) -> Admin {
        Admin {
            id: id.to_string(),
            firstname: "Ada".to_string(),
            lastname: "Obi".to_string(),
            email: format!("{id}@punter.io"),
            password: None,
        }
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_password_shape() {
        let password = generate_password("jane", "Doe", &mut rng()).unwrap();
        let chars: Vec<char> = password.chars().collect();
        assert_eq!(chars.len(), 6);
        assert_eq!(chars[0], 'J');
        assert_eq!(chars[1], 'd');
        let digits: u32 = password[2..5].parse().unwrap();
        assert!((100..=999).contains(&digits));
        assert!(PASSWORD_SYMBOLS.contains(&chars[5]));
    }

    #[test]
    fn test_password_needs_both_names() {
        assert_eq!(generate_password("", "Doe", &mut rng()), None);
        assert_eq!(generate_password("Jane", "", &mut rng()), None);
    }

    #[test]
    fn test_name_change_overrides_manual_password() {
        let mut rng = rng();
        let mut draft = AdminDraft::new();
        draft.set_first_name("Jane", &mut rng);
        assert_eq!(draft.password(), "");

        draft.set_last_name("Doe", &mut rng);
        assert!(draft.password().starts_with("Jd"));

        draft.set_password("hunter2");
        assert_eq!(draft.password(), "hunter2");

        draft.set_last_name("Smith", &mut rng);
        assert!(draft.password().starts_with("Js"));
    }

    #[test]
    fn test_validate_reports_every_field() {
        let err = AdminDraft::new().validate().unwrap_err();
        let ProtocolError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get("firstName"), Some("First name is required"));
        assert_eq!(errors.get("lastName"), Some("Last name is required"));
        assert_eq!(errors.get("email"), Some("Email is required"));
    }

    #[rstest]
    #[case("jane@example.com", true)]
    #[case("jane@example", false)]
    #[case("jane.example.com", false)]
    #[case("a@b.c", true)]
    fn test_email_rule(#[case] email: &str, #[case] valid: bool) {
        let mut draft = AdminDraft::new();
        draft.set_first_name("Jane", &mut rng());
        draft.set_last_name("Doe", &mut rng());
        draft.set_email(email);

        match draft.validate() {
            Ok(payload) => {
                assert!(valid);
                assert_eq!(payload.email, email);
                assert_eq!(payload.password, draft.password());
            }
            Err(ProtocolError::Validation(errors)) => {
                assert!(!valid);
                assert_eq!(errors.get("email"), Some("Email is invalid"));
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_blank_names_are_required() {
        let mut draft = AdminDraft::new();
        draft.set_first_name("   ", &mut rng());
        draft.set_last_name("Doe", &mut rng());
        draft.set_email("jane@example.com");
        let ProtocolError::Validation(errors) = draft.validate().unwrap_err() else {
            panic!("expected validation error");
        };
        assert_eq!(errors.get("firstName"), Some("First name is required"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let roster = AdminRoster::new(vec![admin("a1"), admin("a2")]);
        assert_eq!(
            roster.prepare_delete("a1", Confirmation::Declined),
            Err(ProtocolError::Unconfirmed { id: "a1".to_string() })
        );
        assert!(matches!(
            roster.prepare_delete("zz", Confirmation::Confirmed),
            Err(ProtocolError::NotFound { .. })
        ));
    }

    #[test]
    fn test_apply_delete_removes_only_target() {
        let mut roster = AdminRoster::new(vec![admin("a1"), admin("a2"), admin("a3")]);
        let command = roster.prepare_delete("a2", true.into()).unwrap();
        let removed = roster.apply_delete(&command).unwrap();

        assert_eq!(removed.id, "a2");
        let ids: Vec<_> = roster.admins().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a3"]);
        assert_eq!(roster.apply_delete(&command), None);
    }

    proptest! {
        #[test]
        fn prop_generated_password_is_well_formed(
            first in "[a-zA-Z][a-z]{0,10}",
            last in "[a-zA-Z][a-z]{0,10}",
            seed in any::<u64>(),
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let password = generate_password(&first, &last, &mut rng).unwrap();
            prop_assert_eq!(password.len(), 6);
            prop_assert!(password[2..5].chars().all(|c| c.is_ascii_digit()));
            prop_assert!(password.ends_with(PASSWORD_SYMBOLS));
        }
    }
}
