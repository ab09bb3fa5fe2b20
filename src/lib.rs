pub mod chemistrydata;
pub mod error;
pub mod grains;
pub mod logger;
pub mod network;
pub mod ode;
pub mod reactions;
pub mod reactiontype;
pub mod species;
pub mod thermal;
