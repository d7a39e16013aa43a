//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

pub fn r#false() -> bool {
    false
}

// ============================================================================
// [site] Section Defaults
// ============================================================================

pub mod site {
    pub fn title() -> String {
        "%page_name%".into()
    }

    pub fn favicon() -> Option<String> {
        None
    }

    pub fn language() -> String {
        "en".into()
    }
}

// ============================================================================
// [build] Section Defaults
// ============================================================================

pub mod build {
    use std::path::PathBuf;

    pub fn out_dir() -> PathBuf {
        "dist".into()
    }

    pub fn templates() -> PathBuf {
        "templates".into()
    }

    pub mod expressions {
        pub fn loop_iteration_limit() -> u64 {
            1_000_000
        }

        pub fn recursion_limit() -> usize {
            512
        }

        pub fn stack_size_limit() -> usize {
            10 * 1024
        }
    }
}

// ============================================================================
// [server] Section Defaults
// ============================================================================

pub mod server {
    pub fn interface() -> String {
        "127.0.0.1".into()
    }

    pub fn port() -> u16 {
        5277
    }
}
