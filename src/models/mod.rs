// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model: crop geometry, keyframe timeline and project state.

pub mod crop;
pub mod project;
pub mod timeline;
