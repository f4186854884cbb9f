// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Compatibility with types from the `bytes` package.

mod binary_buffer;
mod byte_ring_buffer;
