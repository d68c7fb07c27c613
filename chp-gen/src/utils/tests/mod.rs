
use chp_core::testutils::*;
use rstest::*;

use super::*;
