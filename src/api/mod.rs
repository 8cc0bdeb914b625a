mod bigfish;

pub use bigfish::*;
