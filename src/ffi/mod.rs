pub mod eip1193;
pub mod kaspa;

pub use self::{
    eip1193::Eip1193Provider,
    kaspa::{KaspaNamespace, KaspaProvider},
};
