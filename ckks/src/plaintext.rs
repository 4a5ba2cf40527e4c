use backend::poly::RingElement;

/// An encoded message: one ring element modulo `Q_level`, tagged with its scale.
#[derive(Clone, Debug, PartialEq)]
pub struct Plaintext {
    element: RingElement,
    scale: f64,
}

impl Plaintext {
    pub fn new(element: RingElement, scale: f64) -> Self {
        Self { element, scale }
    }

    pub fn element(&self) -> &RingElement {
        &self.element
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn level(&self) -> usize {
        self.element.level()
    }

    pub fn ring_degree(&self) -> usize {
        self.element.n()
    }
}
