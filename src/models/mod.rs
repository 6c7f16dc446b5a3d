mod actions;
mod amount;
mod baker;
pub mod datetime_utils;
mod details;
mod display;
mod protocol;
mod staking;

pub use actions::{
    ActionDescriptor, ActionKind, AvailableAction, BakerAction, InputField, InputKind,
    NominationAction,
};
pub use amount::{format_rational, parse_decimal, shorten_address, Amount, Ratio};
pub use baker::{
    BakerConfig, BakerDelegatorDetails, BakerInfo, BakerRewardRecord, DelegationInfo,
    PayoutSchedule,
};
pub use details::{
    DelegateeDetails, DelegateeState, DelegationDetails, DelegatorDetails, DelegatorState,
    UsageDetails,
};
pub use display::{
    Alert, AlertColor, DelegateeSummary, DisplayItem, DisplayList, DisplayText, DisplayUpdate,
    RewardList, RewardRecord, StringKey,
};
pub use protocol::ProtocolInfo;
pub use staking::{
    ElectionStatus, EraReward, LastEraReward, LockedEntry, NominatorDetails, StakingDetails,
    StakingStatus, ValidatorDetails,
};
