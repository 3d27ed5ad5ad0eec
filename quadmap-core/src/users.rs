//! User directory used by the login and admin endpoints.

use std::sync::{Arc, RwLock};

use crate::model::{Email, Role, User, UserId};
use crate::ports::{StoreError, UserDraft, UserStore};

/// `UserStore` kept in process memory.
///
/// Every instance owns its own list, so tests and parallel services never
/// observe each other's users.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with the given users.
    #[must_use]
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: RwLock::new(users),
        }
    }
}

impl UserStore for InMemoryUserStore {
    fn find_by_email(&self, email: &Email) -> Result<Option<User>, StoreError> {
        let users = self.users.read().map_err(|_poisoned| StoreError::Poisoned)?;
        Ok(users.iter().find(|user| &user.email == email).cloned())
    }

    fn insert(&self, draft: UserDraft) -> Result<User, StoreError> {
        let mut users = self.users.write().map_err(|_poisoned| StoreError::Poisoned)?;
        if users.iter().any(|existing| existing.email == draft.email) {
            return Err(StoreError::Duplicate(draft.email));
        }
        let user = User {
            id: next_id(&users),
            email: draft.email,
            display_name: draft.display_name,
            role: draft.role,
        };
        users.push(user.clone());
        Ok(user)
    }

    fn all(&self) -> Result<Vec<User>, StoreError> {
        let users = self.users.read().map_err(|_poisoned| StoreError::Poisoned)?;
        Ok(users.clone())
    }
}

#[derive(Debug, Clone)]
/// Input for [`UserDirectory::create_user`].
pub struct NewUser {
    /// Raw email address as entered by the user.
    pub email: String,
    /// Name shown next to posts.
    pub display_name: String,
    /// Requested access level.
    pub role: Role,
}

/// Generated ids look like `u<n>`; pick one above every such id in use.
fn next_id(users: &[User]) -> UserId {
    let highest = users
        .iter()
        .filter_map(|user| user.id.0.strip_prefix('u')?.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    UserId(format!("u{}", highest.saturating_add(1)))
}

/// Lookup and registration of users on top of an injectable store.
pub struct UserDirectory {
    store: Arc<dyn UserStore>,
}

impl UserDirectory {
    /// Create a directory backed by the provided store.
    #[must_use]
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Find a user by email; the lookup ignores case and surrounding spaces.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidEmail`] for malformed input, or the
    /// store's error when it is unavailable.
    pub fn lookup_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let email = parse_email(email)?;
        self.store.find_by_email(&email)
    }

    /// Register a new user and return it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidEmail`] for malformed input and
    /// [`StoreError::Duplicate`] when the email is already registered.
    pub fn create_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        let email = parse_email(&new_user.email)?;
        if self.store.find_by_email(&email)?.is_some() {
            return Err(StoreError::Duplicate(email));
        }

        let user = self.store.insert(UserDraft {
            email,
            display_name: new_user.display_name.trim().to_owned(),
            role: new_user.role,
        })?;
        log::info!("Created user {} {} ({:?})", user.id.0, user.email, user.role);
        Ok(user)
    }

    /// All users with administrator rights.
    ///
    /// # Errors
    ///
    /// Returns the store's error when it is unavailable.
    pub fn admins(&self) -> Result<Vec<User>, StoreError> {
        Ok(self
            .store
            .all()?
            .into_iter()
            .filter(|user| user.role == Role::Admin)
            .collect())
    }
}

fn parse_email(raw: &str) -> Result<Email, StoreError> {
    Email::parse(raw).ok_or_else(|| StoreError::InvalidEmail(raw.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> UserDirectory {
        UserDirectory::new(Arc::new(InMemoryUserStore::new()))
    }

    fn new_user(email: &str, role: Role) -> NewUser {
        NewUser {
            email: email.to_owned(),
            display_name: " Jane Doe ".to_owned(),
            role,
        }
    }

    #[test]
    fn created_user_can_be_found_case_insensitively() {
        let directory = directory();
        let created = directory
            .create_user(new_user("Jane@Campus.edu", Role::User))
            .expect("user created");

        assert_eq!(created.id, UserId("u1".to_owned()));
        assert_eq!(created.display_name, "Jane Doe");

        let found = directory
            .lookup_by_email(" JANE@campus.edu")
            .expect("lookup succeeds");
        assert_eq!(found, Some(created));
    }

    #[test]
    fn unknown_email_yields_none() {
        let directory = directory();
        assert_eq!(directory.lookup_by_email("nobody@campus.edu"), Ok(None));
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let directory = directory();
        directory
            .create_user(new_user("jane@campus.edu", Role::User))
            .expect("first registration");

        let err = directory
            .create_user(new_user("JANE@campus.edu", Role::Admin))
            .expect_err("second registration must fail");

        assert!(matches!(err, StoreError::Duplicate(email) if email.as_str() == "jane@campus.edu"));
    }

    #[test]
    fn malformed_email_is_rejected() {
        let directory = directory();
        assert_eq!(
            directory.create_user(new_user("not-an-email", Role::User)),
            Err(StoreError::InvalidEmail("not-an-email".to_owned()))
        );
        assert!(directory.lookup_by_email("").is_err());
    }

    #[test]
    fn admins_are_filtered() {
        let directory = directory();
        directory
            .create_user(new_user("a@campus.edu", Role::Admin))
            .expect("admin");
        directory
            .create_user(new_user("b@campus.edu", Role::User))
            .expect("user");

        let admins = directory.admins().expect("admins");
        assert_eq!(admins.len(), 1);
        assert_eq!(admins.first().map(|user| user.email.as_str()), Some("a@campus.edu"));
    }

    #[test]
    fn stores_are_isolated() {
        let first = directory();
        let second = directory();
        first
            .create_user(new_user("jane@campus.edu", Role::User))
            .expect("user");

        assert_eq!(second.lookup_by_email("jane@campus.edu"), Ok(None));
    }

    fn seed(id: &str, email: &str) -> User {
        User {
            id: UserId(id.to_owned()),
            email: Email::parse(email).expect("valid"),
            display_name: "Seed".to_owned(),
            role: Role::User,
        }
    }

    #[test]
    fn ids_do_not_collide_with_seeded_users() {
        let store = Arc::new(InMemoryUserStore::with_users(vec![
            seed("u1", "first@campus.edu"),
            seed("u7", "second@campus.edu"),
            seed("admin", "third@campus.edu"),
        ]));
        let directory = UserDirectory::new(store.clone());

        let created = directory
            .create_user(new_user("new@campus.edu", Role::User))
            .expect("user created");

        assert_eq!(created.id, UserId("u8".to_owned()));
        let ids: Vec<String> = store
            .all()
            .expect("all users")
            .into_iter()
            .map(|user| user.id.0)
            .collect();
        assert_eq!(ids, vec!["u1", "u7", "admin", "u8"]);
    }

    #[test]
    fn directories_sharing_a_store_hand_out_distinct_ids() {
        let store: Arc<dyn UserStore> = Arc::new(InMemoryUserStore::new());
        let first = UserDirectory::new(Arc::clone(&store));
        let second = UserDirectory::new(Arc::clone(&store));

        let one = first
            .create_user(new_user("one@campus.edu", Role::User))
            .expect("first");
        let two = second
            .create_user(new_user("two@campus.edu", Role::User))
            .expect("second");

        assert_ne!(one.id, two.id);
    }

    #[test]
    fn store_rejects_duplicate_email_on_insert() {
        let store = InMemoryUserStore::with_users(vec![seed("u1", "jane@campus.edu")]);
        let draft = UserDraft {
            email: Email::parse("jane@campus.edu").expect("valid"),
            display_name: "Jane".to_owned(),
            role: Role::User,
        };
        assert!(matches!(store.insert(draft), Err(StoreError::Duplicate(_))));
    }

    #[test]
    fn seeded_store_serves_lookups() {
        let email = Email::parse("admin@campus.edu").expect("valid");
        let store = InMemoryUserStore::with_users(vec![User {
            id: UserId("seed".to_owned()),
            email: email.clone(),
            display_name: "Admin".to_owned(),
            role: Role::Admin,
        }]);
        let found = store.find_by_email(&email).expect("lookup");
        assert_eq!(found.map(|user| user.id), Some(UserId("seed".to_owned())));
    }
}
