use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ComponentType {
    ActionRow = 1,
    Button = 2,
}

impl Serialize for ComponentType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

impl<'de> Deserialize<'de> for ComponentType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = u8::deserialize(deserializer)?;
        match value {
            1 => Ok(Self::ActionRow),
            2 => Ok(Self::Button),
            _ => Err(serde::de::Error::custom(format!(
                "unknown ComponentType: {value}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ButtonStyle {
    Primary = 1,
    Secondary = 2,
    Success = 3,
    Danger = 4,
    Link = 5,
}

impl Serialize for ButtonStyle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

impl<'de> Deserialize<'de> for ButtonStyle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = u8::deserialize(deserializer)?;
        match value {
            1 => Ok(Self::Primary),
            2 => Ok(Self::Secondary),
            3 => Ok(Self::Success),
            4 => Ok(Self::Danger),
            5 => Ok(Self::Link),
            _ => Err(serde::de::Error::custom(format!(
                "unknown ButtonStyle: {value}"
            ))),
        }
    }
}

/// A flat component struct that uses `component_type` to distinguish
/// variants. Fields that don't apply to a given component type stay
/// `None` / empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    /// Child components (only for ActionRow)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Component>,
    /// Custom identifier reported back when the component is used
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_id: Option<String>,
    /// Button style
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<ButtonStyle>,
    /// Button label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// URL for link-style buttons
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub disabled: bool,
}

impl Component {
    /// A clickable button that reports `custom_id` back on use.
    pub fn button(
        style: ButtonStyle,
        label: impl Into<String>,
        custom_id: impl Into<String>,
    ) -> Self {
        Self {
            component_type: ComponentType::Button,
            components: Vec::new(),
            custom_id: Some(custom_id.into()),
            style: Some(style),
            label: Some(label.into()),
            url: None,
            disabled: false,
        }
    }

    /// A link button; opens `url` and never produces an interaction.
    pub fn link_button(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            component_type: ComponentType::Button,
            components: Vec::new(),
            custom_id: None,
            style: Some(ButtonStyle::Link),
            label: Some(label.into()),
            url: Some(url.into()),
            disabled: false,
        }
    }

    /// A row holding up to five buttons.
    pub fn action_row(components: Vec<Component>) -> Self {
        Self {
            component_type: ComponentType::ActionRow,
            components,
            custom_id: None,
            style: None,
            label: None,
            url: None,
            disabled: false,
        }
    }
}
