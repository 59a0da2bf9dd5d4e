//! Notification capability carrying an issued code
//!
//! Any notification the issuer dispatches must implement
//! [`VerificationCodeNotification`]. Notifications are selected by name from a
//! [`NotificationRegistry`]; only types implementing the capability can be
//! registered, so a configured name that does not resolve is the one
//! configuration failure left for runtime.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use vc_shared::config::DEFAULT_NOTIFICATION;

use crate::errors::{DomainError, DomainResult};

/// Rendered text of a notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationContent {
    pub subject: String,
    pub body: String,
}

/// Capability every verification code notification provides
pub trait VerificationCodeNotification: Send + Sync + fmt::Debug {
    /// Name the notification is registered under
    fn name(&self) -> &str;

    /// The issued code
    fn code(&self) -> &str;

    /// Queue the delivery should be deferred to, if any
    fn queue(&self) -> Option<&str>;

    /// Set or clear the delivery queue
    fn set_queue(&mut self, queue: Option<String>);

    /// Text delivered to the verifiable
    fn content(&self) -> NotificationContent {
        NotificationContent {
            subject: "Your verification code".to_string(),
            body: format!("Your verification code is: {}", self.code()),
        }
    }
}

/// Built-in notification sent when a code is created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationCodeCreated {
    pub code: String,
    pub queue: Option<String>,
}

impl VerificationCodeCreated {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            queue: None,
        }
    }
}

impl VerificationCodeNotification for VerificationCodeCreated {
    fn name(&self) -> &str {
        DEFAULT_NOTIFICATION
    }

    fn code(&self) -> &str {
        &self.code
    }

    fn queue(&self) -> Option<&str> {
        self.queue.as_deref()
    }

    fn set_queue(&mut self, queue: Option<String>) {
        self.queue = queue;
    }
}

type Constructor = Arc<dyn Fn(String) -> Box<dyn VerificationCodeNotification> + Send + Sync>;

/// Named constructors for verification code notifications
#[derive(Clone)]
pub struct NotificationRegistry {
    constructors: HashMap<String, Constructor>,
}

impl NotificationRegistry {
    /// Create a registry without any notification
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Create a registry holding the built-in [`VerificationCodeCreated`]
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(DEFAULT_NOTIFICATION, |code| VerificationCodeCreated::new(code));
        registry
    }

    /// Register a notification type under `name`, replacing any previous entry
    pub fn register<N, F>(&mut self, name: impl Into<String>, constructor: F) -> &mut Self
    where
        N: VerificationCodeNotification + 'static,
        F: Fn(String) -> N + Send + Sync + 'static,
    {
        let constructor: Constructor =
            Arc::new(move |code| -> Box<dyn VerificationCodeNotification> {
                Box::new(constructor(code))
            });
        self.constructors.insert(name.into(), constructor);
        self
    }

    /// Whether a notification is registered under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(Self::effective_name(name))
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Look up the notification configured as `name`
    ///
    /// An empty name selects the built-in notification.
    ///
    /// # Errors
    /// `DomainError::Configuration` when nothing implementing the capability
    /// is registered under that name.
    pub fn resolve(&self, name: &str) -> DomainResult<ResolvedNotification> {
        let name = Self::effective_name(name);
        self.constructors
            .get(name)
            .map(|constructor| ResolvedNotification {
                name: name.to_string(),
                constructor: Arc::clone(constructor),
            })
            .ok_or_else(DomainError::invalid_notification)
    }

    fn effective_name(name: &str) -> &str {
        let name = name.trim();
        if name.is_empty() {
            DEFAULT_NOTIFICATION
        } else {
            name
        }
    }
}

impl Default for NotificationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NotificationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationRegistry")
            .field("names", &self.names())
            .finish()
    }
}

/// A notification looked up from the registry, ready to be built
#[derive(Clone)]
pub struct ResolvedNotification {
    name: String,
    constructor: Constructor,
}

impl ResolvedNotification {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Build the notification for an issued code
    pub fn build(
        &self,
        code: String,
        queue: Option<String>,
    ) -> Box<dyn VerificationCodeNotification> {
        let mut notification = (self.constructor)(code);
        notification.set_queue(queue);
        notification
    }
}

impl fmt::Debug for ResolvedNotification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedNotification")
            .field("name", &self.name)
            .finish()
    }
}
