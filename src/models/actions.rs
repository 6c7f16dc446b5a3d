use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Amount, StringKey};

/// Raw staking actions of the nomination model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NominationAction {
    BondNominate,
    Nominate,
    ChangeNomination,
    BondExtra,
    CancelNomination,
    Unbond,
    WithdrawUnbonded,
}

/// Raw delegation actions of the single-delegate model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BakerAction {
    Delegate,
    Undelegate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActionKind {
    Nomination(NominationAction),
    Baker(BakerAction),
}

impl From<NominationAction> for ActionKind {
    fn from(action: NominationAction) -> Self {
        ActionKind::Nomination(action)
    }
}

impl From<BakerAction> for ActionKind {
    fn from(action: BakerAction) -> Self {
        ActionKind::Baker(action)
    }
}

/// An action the chain currently allows for an account, with the argument names it takes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableAction<K> {
    #[serde(rename = "type")]
    pub kind: K,
    #[serde(default)]
    pub args: Vec<String>,
}

impl<K> AvailableAction<K> {
    pub fn new(kind: K) -> Self {
        Self { kind, args: vec![] }
    }

    pub fn with_args<I, S>(kind: K, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind,
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn accepts(&self, arg: &str) -> bool {
        self.args.iter().any(|a| a == arg)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputKind {
    /// Addresses the action targets.
    Targets,
    /// User-editable amount in whole coins.
    Amount {
        min: Amount,
        max: Amount,
        decimals: u32,
    },
    /// Value carried along with the action but not shown.
    Hidden,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputField {
    pub name: String,
    #[serde(flatten)]
    pub kind: InputKind,
    pub value: Value,
}

impl InputField {
    pub fn new(name: impl Into<String>, kind: InputKind, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            kind,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    pub label: StringKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<StringKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirm_label: Option<StringKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<Vec<InputField>>,
}

impl ActionDescriptor {
    pub fn new(kind: impl Into<ActionKind>, label: impl Into<StringKey>) -> Self {
        Self {
            kind: kind.into(),
            label: label.into(),
            description: None,
            confirm_label: None,
            icon: None,
            input_schema: None,
        }
    }

    pub fn field(&self, name: &str) -> Option<&InputField> {
        self.input_schema
            .as_ref()
            .and_then(|fields| fields.iter().find(|field| field.name == name))
    }
}
