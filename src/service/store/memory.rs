//! In-memory implementation of the store.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::base::types::{PanelList, TriggerTable, Void};

use super::GenericStore;

/// Keeps both collections in process memory; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    triggers: RwLock<TriggerTable>,
    panel: RwLock<PanelList>,
}

impl MemoryStore {
    pub fn with_contents(triggers: TriggerTable, panel: PanelList) -> Self {
        Self {
            triggers: RwLock::new(triggers),
            panel: RwLock::new(panel),
        }
    }
}

#[async_trait]
impl GenericStore for MemoryStore {
    async fn load_triggers(&self) -> TriggerTable {
        self.triggers.read().await.clone()
    }

    async fn save_triggers(&self, triggers: &TriggerTable) -> Void {
        *self.triggers.write().await = triggers.clone();
        Ok(())
    }

    async fn load_panel(&self) -> PanelList {
        self.panel.read().await.clone()
    }

    async fn save_panel(&self, panel: &PanelList) -> Void {
        *self.panel.write().await = panel.clone();
        Ok(())
    }
}
