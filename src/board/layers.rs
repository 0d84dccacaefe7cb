//! Layer stack and well-known layer names

use serde::{Deserialize, Serialize};

pub const TOP_COPPER: &str = "top_cu";
pub const BOT_COPPER: &str = "bot_cu";
pub const BOARD_OUTLINES: &str = "brd_outlines";
pub const TOP_COURTYARD: &str = "top_courtyard";
pub const BOT_COURTYARD: &str = "bot_courtyard";

/// Copper layers are named `top_cu`, `bot_cu` and `in<N>_cu`
pub fn is_copper_layer(name: &str) -> bool {
    name.ends_with("_cu")
}

pub fn is_inner_layer(name: &str) -> bool {
    name.starts_with("in") && is_copper_layer(name)
}

pub fn inner_copper_layer_name(number: usize) -> String {
    format!("in{}_cu", number)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer {
    pub name: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub visible: bool,
}

fn default_true() -> bool {
    true
}

impl Layer {
    pub fn new(name: &str) -> Self {
        Layer {
            name: name.to_string(),
            enabled: true,
            visible: true,
        }
    }

    pub fn is_copper(&self) -> bool {
        is_copper_layer(&self.name)
    }

    pub fn is_enabled_copper(&self) -> bool {
        self.enabled && self.is_copper()
    }
}

/// Ordered list of board layers, top to bottom for copper
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerStack {
    layers: Vec<Layer>,
}

impl LayerStack {
    pub fn new(layers: Vec<Layer>) -> Self {
        LayerStack { layers }
    }

    /// Standard stack with `inner` inner copper layers
    pub fn with_inner_layers(inner: usize) -> Self {
        let mut layers = vec![Layer::new(BOARD_OUTLINES), Layer::new(TOP_COURTYARD), Layer::new(TOP_COPPER)];
        layers.extend((1..=inner).map(|n| Layer::new(&inner_copper_layer_name(n))));
        layers.push(Layer::new(BOT_COPPER));
        layers.push(Layer::new(BOT_COURTYARD));
        LayerStack { layers }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name == name)
    }

    pub fn layer_mut(&mut self, name: &str) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.name == name)
    }

    /// Enabled copper layers in stack order
    pub fn enabled_copper_layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter().filter(|l| l.is_enabled_copper())
    }

    pub fn is_enabled_copper(&self, name: &str) -> bool {
        self.layer(name).map_or(false, |l| l.is_enabled_copper())
    }

    /// Layers with the given names, in stack order
    pub fn layers_named<'a>(&'a self, names: &'a [&'a str]) -> impl Iterator<Item = &'a Layer> + 'a {
        self.layers.iter().filter(move |l| names.contains(&l.name.as_str()))
    }
}

impl Default for LayerStack {
    fn default() -> Self {
        LayerStack::with_inner_layers(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_copper_layer() {
        assert!(is_copper_layer("top_cu"));
        assert!(is_copper_layer("in3_cu"));
        assert!(!is_copper_layer("top_courtyard"));
        assert!(!is_copper_layer("brd_outlines"));
        assert!(is_inner_layer("in1_cu"));
        assert!(!is_inner_layer("bot_cu"));
    }

    #[test]
    fn test_enabled_copper_order() {
        let mut stack = LayerStack::with_inner_layers(2);
        stack.layer_mut("in2_cu").unwrap().enabled = false;
        let names: Vec<&str> = stack.enabled_copper_layers().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["top_cu", "in1_cu", "bot_cu"]);
        assert!(!stack.is_enabled_copper("in2_cu"));
        assert!(!stack.is_enabled_copper("top_courtyard"));
    }
}
