use std::collections::HashMap;

use time::{macros::datetime, OffsetDateTime};

use crate::auth::{
    error::AuthError,
    repo_types::{NewUser, Role, User},
};

/// In-memory user list plus the plaintext credential map keyed by lowercased email.
#[derive(Debug)]
pub struct UserStore {
    users: Vec<User>,
    credentials: HashMap<String, String>,
    next_id: u64,
}

pub const SEED_PASSWORD: &str = "123456";

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore {
    pub fn new() -> Self {
        Self {
            users: Vec::new(),
            credentials: HashMap::new(),
            next_id: 1,
        }
    }

    /// Store pre-populated with the three fixture users.
    pub fn seeded() -> Self {
        let mut store = Self::new();
        let seeds = [
            (
                "João Silva",
                "joao@test.com",
                "12345678909",
                Role::Doorman,
                datetime!(2024-01-15 10:30:00 UTC),
                Some(datetime!(2025-09-04 15:45:00 UTC)),
            ),
            (
                "Maria Santos",
                "maria@test.com",
                "98765432100",
                Role::Resident,
                datetime!(2024-01-10 08:20:00 UTC),
                None,
            ),
            (
                "Sindico Adailton",
                "sindico@test.com",
                "56346475339",
                Role::Manager,
                datetime!(2024-01-05 10:30:00 UTC),
                Some(datetime!(2025-09-04 15:45:00 UTC)),
            ),
        ];
        for (name, email, cpf, role, created_at, updated_at) in seeds {
            let id = store.allocate_id();
            store.users.push(User {
                id,
                name: name.into(),
                email: email.into(),
                cpf: cpf.into(),
                phone: None,
                created_at,
                updated_at,
                is_active: true,
                role,
            });
            store.credentials.insert(email.into(), SEED_PASSWORD.into());
        }
        store
    }

    fn allocate_id(&mut self) -> String {
        let id = self.next_id;
        self.next_id += 1;
        id.to_string()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn first(&self) -> Option<&User> {
        self.users.first()
    }

    pub fn find_by_id(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn find_by_email(&self, email: &str) -> Option<&User> {
        self.users.iter().find(|u| u.email == email)
    }

    pub fn password_for(&self, email: &str) -> Option<&str> {
        self.credentials.get(email).map(String::as_str)
    }

    /// Registered emails in stable order.
    pub fn credential_emails(&self) -> Vec<String> {
        let mut emails: Vec<String> = self.credentials.keys().cloned().collect();
        emails.sort();
        emails
    }

    pub fn email_taken(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        self.users.iter().any(|u| u.email.to_lowercase() == email)
    }

    pub fn cpf_taken(&self, cpf_digits: &str) -> bool {
        self.users
            .iter()
            .any(|u| crate::auth::cpf::normalize(&u.cpf) == cpf_digits)
    }

    /// Adds a credential without a user record.
    pub fn insert_credential(&mut self, email: &str, password: &str) {
        self.credentials
            .insert(email.trim().to_lowercase(), password.to_string());
    }

    /// Uniqueness checks and append happen under one borrow, so callers holding
    /// the write lock get an atomic insert.
    pub fn insert(&mut self, new: NewUser, now: OffsetDateTime) -> Result<User, AuthError> {
        if self.email_taken(&new.email) {
            return Err(AuthError::DuplicateEmail);
        }
        if self.cpf_taken(&new.cpf) {
            return Err(AuthError::DuplicateCpf);
        }

        let user = User {
            id: self.allocate_id(),
            name: new.name,
            email: new.email,
            cpf: new.cpf,
            phone: new.phone,
            created_at: now,
            updated_at: None,
            is_active: true,
            role: Role::Resident,
        };
        self.credentials.insert(user.email.clone(), new.password);
        self.users.push(user.clone());
        Ok(user)
    }
}
