use crate::animation::ease::Ease;

/// What a tween animates: a page element by selector, or the 3D visual.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    Element(String),
    Visual,
}

impl Target {
    pub fn element(selector: impl Into<String>) -> Self {
        Target::Element(selector.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    X,
    Y,
    Scale,
    Opacity,
    RotationZ,
}

impl Property {
    /// Value of the property on an untouched element.
    pub fn rest_value(self) -> f32 {
        match self {
            Property::Scale | Property::Opacity => 1.0,
            Property::X | Property::Y | Property::RotationZ => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Channel {
    pub property: Property,
    pub from: f32,
    pub to: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    pub target: Target,
    pub channels: Vec<Channel>,
    pub duration: f32,
    pub ease: Ease,
}

impl Tween {
    pub fn new(target: Target) -> Self {
        Self {
            target,
            channels: Vec::new(),
            duration: 1.0,
            ease: Ease::default(),
        }
    }

    /// Animates from the property's rest value to `to`.
    pub fn to(self, property: Property, to: f32) -> Self {
        self.from_to(property, property.rest_value(), to)
    }

    pub fn from_to(mut self, property: Property, from: f32, to: f32) -> Self {
        self.channels.push(Channel { property, from, to });
        self
    }

    pub fn duration(mut self, duration: f32) -> Self {
        self.duration = duration.max(0.0);
        self
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Values of every channel at local progress `t` in `0.0..=1.0`.
    pub fn sample(&self, t: f32) -> impl Iterator<Item = (Property, f32)> + '_ {
        let eased = self.ease.apply(t);
        self.channels.iter().map(move |channel| {
            (
                channel.property,
                channel.from + (channel.to - channel.from) * eased,
            )
        })
    }
}
