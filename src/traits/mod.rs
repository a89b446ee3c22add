pub mod agent;
pub mod data_store;
pub mod odf;

pub use agent::{AgentBuilder, BuiltAgent, InternalAgent, ResponsibleAgent};
pub use data_store::{DataStore, DbHandle};
pub use odf::Odf;
