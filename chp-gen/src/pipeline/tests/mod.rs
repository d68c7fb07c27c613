mod pipeline_test;

use chp_core::testutils::*;
use rstest::*;

use super::*;
