// DataFs - filesystem-like access to DVC-tracked repositories
// Copyright (C) 2026 DataFs Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.

//! # DataFs Test Utilities
//!
//! Shared fixtures for DataFs crates. The main entry point is
//! [`FixtureRemote`], a local bare Git repository seeded with an initial
//! commit, usable as a clone URL without any network access.

pub mod remote;

pub use remote::FixtureRemote;
