//! The persisted light/dark preference.

use crate::domain::Theme;
use crate::ports::{PersistenceService, PortResult};
use futures::lock::Mutex;
use std::sync::Arc;
use tracing::error;

pub struct ThemeStore {
    persistence: Arc<dyn PersistenceService>,
    theme: Mutex<Theme>,
}

impl ThemeStore {
    pub async fn load(persistence: Arc<dyn PersistenceService>) -> Self {
        let theme = persistence.load_theme().await.unwrap_or_else(|e| {
            error!("Failed to load theme, using {}: {}", Theme::default().as_str(), e);
            Theme::default()
        });
        Self {
            persistence,
            theme: Mutex::new(theme),
        }
    }

    pub async fn theme(&self) -> Theme {
        *self.theme.lock().await
    }

    pub async fn set_theme(&self, theme: Theme) -> PortResult<()> {
        let mut current = self.theme.lock().await;
        self.persistence.save_theme(theme).await?;
        *current = theme;
        Ok(())
    }

    /// Switches between light and dark and returns the new preference.
    pub async fn toggle_theme(&self) -> PortResult<Theme> {
        let mut current = self.theme.lock().await;
        let next = current.toggled();
        self.persistence.save_theme(next).await?;
        *current = next;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryPersistence;

    #[tokio::test]
    async fn theme_defaults_to_dark_and_persists_changes() {
        let persistence = Arc::new(MemoryPersistence::new());
        let store = ThemeStore::load(persistence.clone()).await;
        assert_eq!(store.theme().await, Theme::Dark);

        assert_eq!(store.toggle_theme().await.unwrap(), Theme::Light);
        assert_eq!(persistence.load_theme().await.unwrap(), Theme::Light);

        store.set_theme(Theme::Dark).await.unwrap();
        let reloaded = ThemeStore::load(persistence).await;
        assert_eq!(reloaded.theme().await, Theme::Dark);
    }
}
