pub mod config;
pub mod config_loader;
pub mod engine;
pub mod precision;
pub mod tracking;
pub mod traits;
pub mod types;

pub use config::{AppConfig, BitunixConfig, EngineConfig};
pub use config_loader::ConfigLoader;
pub use engine::{stop_trigger_price, take_profit_price, Sentinel};
pub use precision::{adjust_price, floor_to_tick, AdjustedPrice};
pub use tracking::TrackingState;
pub use traits::{ExchangeApi, SettingsProvider};
pub use types::{
    OpenOrder, OrderAck, OrderKind, Position, RiskSettings, Side, StopLossIntent,
    TakeProfitIntent, TpslOrder,
};
