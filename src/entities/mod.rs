//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod channel_switch;
pub mod channel_total;
pub mod running_average;
pub mod voice_session;
pub mod warning;

// Re-export specific types to avoid conflicts
pub use channel_switch::{
    Column as ChannelSwitchColumn, Entity as ChannelSwitch, Model as ChannelSwitchModel,
};
pub use channel_total::{
    Column as ChannelTotalColumn, Entity as ChannelTotal, Model as ChannelTotalModel,
};
pub use running_average::{
    Column as RunningAverageColumn, Entity as RunningAverage, Model as RunningAverageModel,
};
pub use voice_session::{
    Column as VoiceSessionColumn, Entity as VoiceSession, Model as VoiceSessionModel,
};
pub use warning::{Column as WarningColumn, Entity as Warning, Model as WarningModel};
