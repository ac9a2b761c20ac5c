use std::fmt;

use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Position { x, y, z }
    }
}

impl From<[f32; 3]> for Position {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Position { x, y, z }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Texel {
    pub u: f32,
    pub v: f32,
}

impl Texel {
    pub fn new(u: f32, v: f32) -> Self {
        Texel { u, v }
    }
}

/// Extended vertex record, stored on disk exactly as laid out here.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: Position,
    pub normal: Position,
    pub texel: Texel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VertexLayout {
    /// `{x, y, z}` only.
    Position,
    /// `{position, normal, texel}`.
    Full,
}

impl VertexLayout {
    pub fn record_size(self) -> usize {
        match self {
            VertexLayout::Position => std::mem::size_of::<Position>(),
            VertexLayout::Full => std::mem::size_of::<Vertex>(),
        }
    }
}

impl fmt::Display for VertexLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VertexLayout::Position => f.write_str("position-only"),
            VertexLayout::Full => f.write_str("position+normal+texel"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum VertexData {
    Positions(Vec<Position>),
    Full(Vec<Vertex>),
}

impl VertexData {
    pub fn empty(layout: VertexLayout) -> Self {
        match layout {
            VertexLayout::Position => VertexData::Positions(Vec::new()),
            VertexLayout::Full => VertexData::Full(Vec::new()),
        }
    }

    pub fn layout(&self) -> VertexLayout {
        match self {
            VertexData::Positions(_) => VertexLayout::Position,
            VertexData::Full(_) => VertexLayout::Full,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            VertexData::Positions(positions) => positions.len(),
            VertexData::Full(vertices) => vertices.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn position(&self, index: usize) -> Option<Position> {
        match self {
            VertexData::Positions(positions) => positions.get(index).copied(),
            VertexData::Full(vertices) => vertices.get(index).map(|vertex| vertex.position),
        }
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.len()).filter_map(move |index| self.position(index))
    }

    /// Converts to `layout`. Going to position-only drops normals and
    /// texels; going the other way fills them with zeros.
    pub fn to_layout(&self, layout: VertexLayout) -> VertexData {
        match (self, layout) {
            (VertexData::Full(vertices), VertexLayout::Position) => {
                VertexData::Positions(vertices.iter().map(|vertex| vertex.position).collect())
            }
            (VertexData::Positions(positions), VertexLayout::Full) => VertexData::Full(
                positions
                    .iter()
                    .map(|&position| Vertex {
                        position,
                        ..Default::default()
                    })
                    .collect(),
            ),
            _ => self.clone(),
        }
    }

    /// Raw record bytes in file order.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            VertexData::Positions(positions) => bytemuck::cast_slice(positions),
            VertexData::Full(vertices) => bytemuck::cast_slice(vertices),
        }
    }
}

impl Default for VertexData {
    fn default() -> Self {
        VertexData::Full(Vec::new())
    }
}
