// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations: settings, media decoding and the external encoder.

pub mod config;
pub mod encoder;
pub mod media;
