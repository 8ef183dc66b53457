// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Context adapters for the ingestion manager.
//!
//! Each adapter should be defined by the user of the library based on their
//! specific extraction, storage and ledger endpoints. This modular design
//! allows for easy integration with various backends, thereby making the
//! library adaptable to a wide range of use cases.

mod extractor;
mod ledger;
mod store;

pub use extractor::ReceiptExtractor;
pub use ledger::*;
pub use store::*;
