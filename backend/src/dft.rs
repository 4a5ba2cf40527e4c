pub mod embedding;

pub trait DFT<O> {
    fn forward_inplace(&self, a: &mut [O]);
    fn backward_inplace(&self, a: &mut [O]);
}
