// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

mod test_basic;
mod test_iter;
mod test_markup;
mod test_tabs;
mod utils;
