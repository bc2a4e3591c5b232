//! Output key names for the fields this crate knows about.
//!
//! Every field role (time, message, transaction id, ...) maps to the literal
//! key written into each JSON line. Services can rename any subset of them
//! through [`KeyNameOverrides`]; roles left unset keep their default key.

use serde::Deserialize;

macro_rules! key_roles {
    ($( $(#[$doc:meta])* $role:ident => $default:ident = $key:literal; )*) => {
        $(
            $(#[$doc])*
            pub const $default: &str = $key;
        )*

        /// Fully resolved role → key mapping. Every key is non-empty.
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct KeyNames {
            $( $role: String, )*
        }

        /// Partial key configuration. `None` and `Some("")` both mean
        /// "use the default key".
        #[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
        #[serde(default)]
        pub struct KeyNameOverrides {
            $( pub $role: Option<String>, )*
        }

        impl Default for KeyNames {
            fn default() -> Self {
                KeyNames { $( $role: $default.to_string(), )* }
            }
        }

        impl KeyNames {
            /// Merge `overrides` with the defaults.
            pub fn resolve(overrides: &KeyNameOverrides) -> Self {
                KeyNames { $( $role: pick(overrides.$role.as_deref(), $default), )* }
            }

            $(
                $(#[$doc])*
                pub fn $role(&self) -> &str {
                    &self.$role
                }
            )*
        }
    };
}

key_roles! {
    /// Key holding the record level.
    level => DEFAULT_KEY_LEVEL = "level";
    /// Key holding the message.
    msg => DEFAULT_KEY_MSG = "msg";
    /// Key holding an attached error.
    error => DEFAULT_KEY_ERROR = "error";
    /// Key holding the record timestamp.
    time => DEFAULT_KEY_TIME = "@time";
    service_name => DEFAULT_KEY_SERVICE_NAME = "service_name";
    transaction_id => DEFAULT_KEY_TRANSACTION_ID = "transaction_id";
    uuid => DEFAULT_KEY_UUID = "uuid";
    is_valid => DEFAULT_KEY_IS_VALID = "isValid";
    /// Key holding the event name of monitoring and categorised events.
    event_name => DEFAULT_KEY_EVENT_NAME = "event";
    monitoring_event => DEFAULT_KEY_MONITORING_EVENT = "monitoring_event";
    content_type => DEFAULT_KEY_CONTENT_TYPE = "content_type";
    event_category => DEFAULT_KEY_EVENT_CATEGORY = "event_category";
    event_msg => DEFAULT_KEY_EVENT_MSG = "event_msg";
}

fn pick(candidate: Option<&str>, default: &str) -> String {
    match candidate {
        Some(key) if !key.is_empty() => key.to_string(),
        _ => default.to_string(),
    }
}
