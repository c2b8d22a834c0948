//! Body registry
//!
//! Owns the ordered body list and the selection. Selection is stored as a
//! [`BodyId`], so structural removals never leave it pointing at the wrong
//! body; the positional index is derived on demand.

use glam::Vec2;

use super::body::{Body, BodyId, Color};

#[derive(Debug, Clone)]
pub struct BodyRegistry {
    /// Insertion order, which is also hit-test and sweep order
    bodies: Vec<Body>,
    selected: Option<BodyId>,
    next_id: u32,
}

impl Default for BodyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BodyRegistry {
    pub fn new() -> Self {
        Self {
            bodies: Vec::new(),
            selected: None,
            next_id: 1,
        }
    }

    /// Append a new body. Never fails.
    pub fn insert(&mut self, pos: Vec2, vel: Vec2, color: Color, radius: f32) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        self.bodies.push(Body::new(id, pos, vel, color, radius));
        id
    }

    /// Remove the body at `index`, shifting later bodies down by one.
    ///
    /// Removing the selected body clears the selection; any other selection
    /// keeps referring to the same body. Out of range is a no-op.
    pub fn remove_at(&mut self, index: usize) -> Option<Body> {
        if index >= self.bodies.len() {
            return None;
        }
        let body = self.bodies.remove(index);
        if self.selected == Some(body.id) {
            self.selected = None;
        }
        Some(body)
    }

    /// Remove the body with `id`, wherever it currently sits
    pub fn remove(&mut self, id: BodyId) -> Option<Body> {
        let index = self.index_of(id)?;
        self.remove_at(index)
    }

    /// Select the body at `index`, stopping it and painting it with the
    /// highlight color. Out of range is a no-op.
    pub fn select(&mut self, index: usize) -> Option<BodyId> {
        let body = self.bodies.get_mut(index)?;
        body.arm();
        self.selected = Some(body.id);
        Some(body.id)
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected_id(&self) -> Option<BodyId> {
        self.selected
    }

    /// Current position of the selected body in the list
    pub fn selected_index(&self) -> Option<usize> {
        self.index_of(self.selected?)
    }

    pub fn selected(&self) -> Option<&Body> {
        self.bodies.get(self.selected_index()?)
    }

    pub fn selected_mut(&mut self) -> Option<&mut Body> {
        let index = self.selected_index()?;
        self.bodies.get_mut(index)
    }

    pub fn index_of(&self, id: BodyId) -> Option<usize> {
        self.bodies.iter().position(|b| b.id == id)
    }

    /// First body (in list order) containing `point`
    pub fn hit_test(&self, point: Vec2) -> Option<usize> {
        self.bodies.iter().position(|b| b.contains(point))
    }

    pub fn get(&self, index: usize) -> Option<&Body> {
        self.bodies.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Body> {
        self.bodies.get_mut(index)
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}
