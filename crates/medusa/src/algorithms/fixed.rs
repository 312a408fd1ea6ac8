//! The identity layout: keeps whatever positions the model already holds.
//! Useful as a baseline, or to freeze a hand-arranged graph while still going
//! through the `accept` machinery.

use super::LayoutAlgorithm;
use crate::error::Result;
use crate::model::LayoutModel;

#[derive(Debug, Default)]
pub struct StaticLayout;

impl LayoutAlgorithm for StaticLayout {
    fn visit(&mut self, _model: &mut LayoutModel) -> Result<()> {
        Ok(())
    }
}
