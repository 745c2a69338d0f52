#![cfg(feature = "batch_test")]

use hamres::io::read_expected;
use hamres::{check_hypercube_resolving, cross_check, DecideOpts};

#[test]
fn check_reference_data() -> Result<(), Box<dyn std::error::Error>> {
    let proj_dir = std::env!("CARGO_MANIFEST_DIR");
    let path = format!("{proj_dir}/data/res-sets.tsv");

    for rec in read_expected(&path)? {
        let inst = rec.instance()?;
        let v = cross_check(&inst, &DecideOpts::default())?;
        assert_eq!(v.resolving, rec.resolving, "{inst}");

        if rec.a == 2 {
            let shortcut = check_hypercube_resolving(inst.r(), rec.k)?;
            assert_eq!(shortcut, rec.resolving, "{inst} (hypercube)");
        }
    }

    Ok(())
}
