#![allow(dead_code)]

use std::fs;
use std::path::Path;

/// Bridge export with `averages` on line index 8 and the given turns correction.
pub fn bvd_text(averages: i64, k_mturns: &str) -> String {
    format!(
        "Magnicon CCC bvd export\n\
         start date: 03/02/2026\n\
         start time: 11:27:04\n\
         stop date: 03/02/2026\n\
         stop time: 11:58:40\n\
         R1 Info:  R100\n\
         R2 Info:  R1\n\
         R1 (Ohm): 100\n\
         bvd averages: {averages}\n\
         R2 (Ohm): 1\n\
         N1 (Turns): 2000\n\
         N2 (Turns): 20\n\
         NA (Turns): 1\n\
         delta N1/NA (mTurns): {k_mturns}\n\
         delta (I2*R2) (V): 1.0\n\
         \n\
         index   time       bvd(V)      std(V)\n\
         1       11:28:00   1.10e-6     5.0e-9\n\
         2       11:29:00   1.30e-6     6.0e-9\n\
         avg     --         1.234e-6    5.6e-9\n"
    )
}

pub fn cfg_text(cal_mode: &str, cn_short: &str, range_code: &str) -> String {
    format!(
        "[CN]\n\
         cn_calmode 3 = {cal_mode}\n\
         cn_short 3 = {cn_short}\n\
         cn_rangeshunt 3 = {range_code}\n"
    )
}

pub fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).expect("write fixture");
}
