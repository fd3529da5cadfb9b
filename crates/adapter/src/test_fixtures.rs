//! Shared capability fixtures for engine tests.
//!
//! Two small worlds: a zoo whose conversions exist only through registered
//! converters, and a source tree whose capability declarations give lineage
//! distances for the ranking tests.

use std::sync::Arc;

use crate::core::Adaptive;
use crate::{Adapter, capability};

pub(crate) trait Animal: Adaptive {
	fn species(&self) -> &'static str;
}

pub(crate) struct Dog;

pub(crate) struct Cat;

pub(crate) struct Vehicle;

/// View produced by [`DogAsAnimal`]; no subject type implements `Animal`
/// directly, so the only route to it is the converter.
pub(crate) struct Leashed {
	pub(crate) species: &'static str,
}

impl Animal for Leashed {
	fn species(&self) -> &'static str {
		self.species
	}
}

capability! { dyn Animal }
capability! { Dog }
capability! { Cat }
capability! { Vehicle }

pub(crate) struct DogAsAnimal;

impl Adapter<Dog, dyn Animal> for DogAsAnimal {
	fn adapt(&self, _source: &Arc<Dog>) -> Arc<dyn Animal> {
		Arc::new(Leashed { species: "dog" })
	}
}

pub(crate) trait Node: Adaptive {
	fn label(&self) -> &'static str;
}

pub(crate) trait FileNode: Node {
	fn extension(&self) -> &'static str;
}

pub(crate) trait Versioned: Adaptive {
	fn revision(&self) -> u32;
}

pub(crate) struct SourceFile {
	pub(crate) label: &'static str,
}

impl Node for SourceFile {
	fn label(&self) -> &'static str {
		self.label
	}
}

impl FileNode for SourceFile {
	fn extension(&self) -> &'static str {
		"rs"
	}
}

impl Versioned for SourceFile {
	fn revision(&self) -> u32 {
		1
	}
}

capability! { dyn Node }
capability! { dyn FileNode => dyn Node }
capability! { dyn Versioned }
capability! { SourceFile => dyn FileNode, dyn Versioned }

/// Proxy node: implements the trait but is never declared as a capability,
/// so only its declared binding can resolve it.
pub(crate) struct RemoteNode;

impl Node for RemoteNode {
	fn label(&self) -> &'static str {
		"remote"
	}
}

/// Declared with no generalizations: its runtime lineage is just itself, so
/// every conversion has to come from whichever capability it was bound as.
pub(crate) struct ProxyFile;

impl Node for ProxyFile {
	fn label(&self) -> &'static str {
		"proxy"
	}
}

impl Versioned for ProxyFile {
	fn revision(&self) -> u32 {
		0
	}
}

capability! { ProxyFile }

pub(crate) struct NodeBadge {
	pub(crate) by: &'static str,
}

capability! { NodeBadge }

pub(crate) trait Glyph: Adaptive {
	fn shape(&self) -> &'static str;
}

pub(crate) trait TintedGlyph: Glyph {
	fn tint(&self) -> &'static str;
}

capability! { dyn Glyph }
capability! { dyn TintedGlyph => dyn Glyph }

struct PlainGlyph;

impl Glyph for PlainGlyph {
	fn shape(&self) -> &'static str {
		"plain"
	}
}

struct BlueGlyph;

impl Glyph for BlueGlyph {
	fn shape(&self) -> &'static str {
		"tinted"
	}
}

impl TintedGlyph for BlueGlyph {
	fn tint(&self) -> &'static str {
		"blue"
	}
}

pub(crate) struct NodeBadger;

impl Adapter<dyn Node, NodeBadge> for NodeBadger {
	fn adapt(&self, _source: &Arc<dyn Node>) -> Arc<NodeBadge> {
		Arc::new(NodeBadge { by: "NodeBadger" })
	}
}

pub(crate) struct FileBadger;

impl Adapter<dyn FileNode, NodeBadge> for FileBadger {
	fn adapt(&self, _source: &Arc<dyn FileNode>) -> Arc<NodeBadge> {
		Arc::new(NodeBadge { by: "FileBadger" })
	}
}

pub(crate) struct VersionBadger;

impl Adapter<dyn Versioned, NodeBadge> for VersionBadger {
	fn adapt(&self, _source: &Arc<dyn Versioned>) -> Arc<NodeBadge> {
		Arc::new(NodeBadge { by: "VersionBadger" })
	}
}

/// One adapter value declaring two pairs; exercises shared instances and the
/// target-specificity ordering.
pub(crate) struct GlyphPainter;

impl Adapter<dyn Node, dyn Glyph> for GlyphPainter {
	fn adapt(&self, _source: &Arc<dyn Node>) -> Arc<dyn Glyph> {
		Arc::new(PlainGlyph)
	}
}

impl Adapter<dyn Node, dyn TintedGlyph> for GlyphPainter {
	fn adapt(&self, _source: &Arc<dyn Node>) -> Arc<dyn TintedGlyph> {
		Arc::new(BlueGlyph)
	}
}

// Inventory-built engines collect exactly these two conversions.
crate::submit_adapters! {
	PAINTER: GlyphPainter = GlyphPainter => {
		dyn Node => dyn Glyph,
		dyn Node => dyn TintedGlyph,
	}
}
