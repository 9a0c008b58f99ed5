//! `SORTDIFF_SCAN=off` turns the prefix scan off for the default kernel.

use sortdiff::prelude::*;

#[test]
fn test_off_disables_prefix_scan() {
    std::env::set_var(DiffConfig::ENV_VAR, "off");

    assert_eq!(default_kernel(), DiffKernel::merge_only());
    assert_eq!(default_kernel().scan(&[1, 2], &[1, 2]), PrefixScan::ResumeAt(0));
    assert_eq!(count_diffs(&[5, 5, 6], &[5, 6, 6], Cap::Unbounded), 2);
}
