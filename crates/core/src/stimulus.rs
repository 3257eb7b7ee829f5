use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One independently scored attribute of a stimulus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Color,
    Emoji,
    Position,
    Shape,
}

impl Channel {
    pub const ALL: [Channel; 4] = [
        Channel::Color,
        Channel::Emoji,
        Channel::Position,
        Channel::Shape,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Channel::Color => "color",
            Channel::Emoji => "emoji",
            Channel::Position => "position",
            Channel::Shape => "shape",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Channel::Color => 0,
            Channel::Emoji => 1,
            Channel::Position => 2,
            Channel::Shape => 3,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown channel: {0}")]
pub struct UnknownChannel(pub String);

impl FromStr for Channel {
    type Err = UnknownChannel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "color" | "colour" => Ok(Channel::Color),
            "emoji" | "symbol" => Ok(Channel::Emoji),
            "position" | "pos" => Ok(Channel::Position),
            "shape" => Ok(Channel::Shape),
            _ => Err(UnknownChannel(s.to_string())),
        }
    }
}

// Each attribute domain is a closed three-value enum. Adding a value means
// extending `ALL` and `label()`; the generator picks it up from `ALL`.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Purple,
    Green,
    Blue,
}

impl Color {
    pub const ALL: [Color; 3] = [Color::Purple, Color::Green, Color::Blue];

    pub fn label(self) -> &'static str {
        match self {
            Color::Purple => "purple",
            Color::Green => "green",
            Color::Blue => "blue",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emoji {
    Fire,
    Ice,
    Flower,
}

impl Emoji {
    pub const ALL: [Emoji; 3] = [Emoji::Fire, Emoji::Ice, Emoji::Flower];

    pub fn label(self) -> &'static str {
        match self {
            Emoji::Fire => "fire",
            Emoji::Ice => "ice",
            Emoji::Flower => "flower",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Left,
    Center,
    Right,
}

impl Position {
    pub const ALL: [Position; 3] = [Position::Left, Position::Center, Position::Right];

    pub fn label(self) -> &'static str {
        match self {
            Position::Left => "left",
            Position::Center => "center",
            Position::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Circle,
    Square,
    Triangle,
}

impl Shape {
    pub const ALL: [Shape; 3] = [Shape::Circle, Shape::Square, Shape::Triangle];

    pub fn label(self) -> &'static str {
        match self {
            Shape::Circle => "circle",
            Shape::Square => "square",
            Shape::Triangle => "triangle",
        }
    }
}

/// A single presented stimulus. Identity is its attribute values, nothing more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stimulus {
    pub color: Color,
    pub emoji: Emoji,
    pub position: Position,
    pub shape: Shape,
}

impl Stimulus {
    pub const fn new(color: Color, emoji: Emoji, position: Position, shape: Shape) -> Self {
        Self {
            color,
            emoji,
            position,
            shape,
        }
    }

    pub fn matches_on(&self, other: &Stimulus, channel: Channel) -> bool {
        match channel {
            Channel::Color => self.color == other.color,
            Channel::Emoji => self.emoji == other.emoji,
            Channel::Position => self.position == other.position,
            Channel::Shape => self.shape == other.shape,
        }
    }
}

impl fmt::Display for Stimulus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{}, {}, {}, {}}}",
            self.color.label(),
            self.emoji.label(),
            self.position.label(),
            self.shape.label()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_parses_case_insensitively() {
        assert_eq!("Color".parse::<Channel>(), Ok(Channel::Color));
        assert_eq!(" SHAPE ".parse::<Channel>(), Ok(Channel::Shape));
        assert_eq!("pos".parse::<Channel>(), Ok(Channel::Position));
        assert!("sound".parse::<Channel>().is_err());
    }

    #[test]
    fn matches_on_compares_a_single_channel() {
        let a = Stimulus::new(Color::Blue, Emoji::Flower, Position::Center, Shape::Square);
        let b = Stimulus::new(Color::Blue, Emoji::Fire, Position::Right, Shape::Circle);

        assert!(a.matches_on(&b, Channel::Color));
        assert!(!a.matches_on(&b, Channel::Emoji));
        assert!(!a.matches_on(&b, Channel::Position));
        assert!(!a.matches_on(&b, Channel::Shape));
    }

    #[test]
    fn serializes_with_lowercase_labels() {
        let s = Stimulus::new(Color::Green, Emoji::Ice, Position::Left, Shape::Triangle);
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(
            json,
            r#"{"color":"green","emoji":"ice","position":"left","shape":"triangle"}"#
        );
        assert_eq!(s.to_string(), "{green, ice, left, triangle}");
    }
}
