// Copyright 2026 The notepick authors
// Licensed under the Apache License, Version 2.0

pub mod model;
pub mod notify;
pub mod reflector;
pub mod state;

pub use model::*;
pub use notify::*;
pub use reflector::*;
pub use state::*;
