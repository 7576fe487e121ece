// Persisted human-judgment inputs: ratings, sentiment lexicon, protections

pub mod lexicon;
pub mod protected;
pub mod store;
