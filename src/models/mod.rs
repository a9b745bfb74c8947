//! Water quality models
//!
//! Empirical bio-optical models that turn ocean-color products into water quality indicators:
//! Secchi depth from the blue/red reflectance ratio, and the trophic state index from Secchi
//! depth.

pub mod constants;
pub mod secchi;
pub mod trophic;

pub use secchi::{SECCHI_BAND, secchi, secchi_depth};
pub use trophic::{TSI_BAND, TrophicClass, trophic_state, trophic_state_index};
