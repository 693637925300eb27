//! Constants for the native provisioning runtime.

/// Default bus coordinates of the provisioning daemon.
pub mod dbus {
    pub const SERVICE: &str = "com.espressif.Provisioning";
    pub const PATH: &str = "/com/espressif/Provisioning";
}

/// Keys of the credential dictionary passed to `CreateDevice`.
pub mod credential_keys {
    pub const POP: &str = "pop";
    pub const SOFTAP_PASSWORD: &str = "softap_password";
    pub const USERNAME: &str = "username";
}

/// Hint attached to [`ProvisionError::NotLinked`](crate::ProvisionError::NotLinked).
pub const LINKING_HINT: &str = "Make sure:\n\
    - the provisioning daemon is installed and running\n\
    - it owns the configured bus name\n\
    - the client is pointed at the right bus (system or session)\n";
