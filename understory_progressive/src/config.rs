// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use understory_piece_request::{GridConfig, ManagerConfig, ManagerKind};

/// Host-facing configuration for a [`DeliveryCoordinator`](crate::DeliveryCoordinator).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DeliveryConfig {
    /// Which request manager orders pending pieces, and its tuning.
    pub manager: ManagerConfig,
}

impl DeliveryConfig {
    /// Selects the request manager.
    #[must_use]
    pub fn with_manager_kind(mut self, kind: ManagerKind) -> Self {
        self.manager = self.manager.with_kind(kind);
        self
    }

    /// Sets the grid tuning used when the grid manager is selected.
    #[must_use]
    pub fn with_grid(mut self, grid: GridConfig) -> Self {
        self.manager = self.manager.with_grid(grid);
        self
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use understory_piece_request::{GridConfig, ManagerKind};

    use super::DeliveryConfig;

    #[test]
    fn missing_fields_take_defaults() {
        let config: DeliveryConfig =
            serde_json::from_str(r#"{ "manager": { "kind": "queue" } }"#).unwrap();
        assert_eq!(config.manager.kind, ManagerKind::Queue);
        assert_eq!(config.manager.grid, GridConfig::default());

        let empty: DeliveryConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, DeliveryConfig::default());
    }

    #[test]
    fn grid_tuning_is_read() {
        let config: DeliveryConfig = serde_json::from_str(
            r#"{ "manager": { "grid": { "resolution": 500.0, "max_ring_count": 3 } } }"#,
        )
        .unwrap();
        assert_eq!(config.manager.kind, ManagerKind::Grid);
        assert_eq!(config.manager.grid, GridConfig::new(500.0, 3));
    }
}
