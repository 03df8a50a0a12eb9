//! Statistical analysis utilities for the CUDYR toolkit.
//!
//! This crate provides the general-purpose statistics used by the metrics
//! engine, with no knowledge of the categorization domain:
//!
//! - **Descriptive statistics**: mean, median, standard deviation and range
//! - **Percentiles**: precomputed percentile values for datasets
//! - **Rank-sum test**: Mann–Whitney U comparison of two numeric samples
//! - **Chi-squared test**: independence test over a contingency table
//!
//! The hypothesis tests compute their statistic locally and delegate the
//! distribution tail to [`statrs`]; p-values are never hand-rolled.
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`percentiles`]: Percentile computation and storage
//! - [`rank_sum`]: Two-sample rank-based comparison
//! - [`chi_squared`]: Categorical independence test
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use cudyr_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! ```
//!
//! ## Comparing two samples
//!
//! ```
//! use cudyr_stats::rank_sum::RankSumTest;
//!
//! let a = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let b = [6.0, 7.0, 8.0, 9.0, 10.0];
//! let test = RankSumTest::new(&a, &b).unwrap();
//! assert!(test.p_value < 0.05);
//! ```

pub mod chi_squared;
pub mod descriptive;
pub mod percentiles;
pub mod rank_sum;
