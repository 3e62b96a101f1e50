// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Turning a keyframe timeline into an encoder run.

pub mod compiler;
pub mod expr;
pub mod job;
