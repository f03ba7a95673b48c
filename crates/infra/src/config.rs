//! Shop configuration.

/// Configuration consumed by the engine's collaborators.
///
/// The checkout engine itself only ever sees `low_stock_threshold` (as a
/// plain integer passed at construction); the admin address belongs to the
/// notification layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopConfig {
    /// A post-purchase stock level strictly below this queues a low-stock
    /// alert.
    pub low_stock_threshold: u32,

    /// Recipient for low-stock alerts and the daily sales report.
    pub admin_email: String,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            low_stock_threshold: 5,
            admin_email: "admin@ecommerce.test".to_string(),
        }
    }
}

impl ShopConfig {
    /// Read overrides from `LOW_STOCK_THRESHOLD` and `ADMIN_EMAIL`,
    /// falling back to the defaults for anything absent or unparseable.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var("LOW_STOCK_THRESHOLD") {
            match raw.parse() {
                Ok(threshold) => config.low_stock_threshold = threshold,
                Err(_) => {
                    tracing::warn!(%raw, "ignoring unparseable LOW_STOCK_THRESHOLD");
                }
            }
        }

        if let Ok(email) = std::env::var("ADMIN_EMAIL") {
            if !email.trim().is_empty() {
                config.admin_email = email;
            }
        }

        config
    }
}
