//! Pipeline Regression Tests
//!
//! End-to-end checks of load -> fit -> predict on CSV fixtures written to a
//! temp directory, plus the numeric properties the pipeline guarantees:
//! determinism, row-order invariance and agreement with an independent
//! normal-equation solve.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use spending_impact::data_prep::{load_from_source, load_observations, prepare, DataSource};
use spending_impact::{
    fit_dynamic, predict, static_params, CoefficientPair, NonPositivePolicy, Observation,
    ObservationTable, PipelineError, RegressionParams,
};
use std::io::Write;

const HEADER: &str =
    "Provinsi,Tahun,Kesehatan + Pendidikan,Output Layanan Kesehatan,AHH,Unmeet Need";

/// Deterministic noisy fixture spanning the slider ranges.
fn synthetic_rows() -> Vec<(String, i32, f64, f64, f64, f64)> {
    let regions = ["Aceh", "Bali", "Jambi", "Riau", "Papua", "Maluku"];
    let mut rows = Vec::new();
    for (i, region) in regions.iter().enumerate() {
        for (k, year) in (2019..=2023).enumerate() {
            let i_f = i as f64;
            let k_f = k as f64;
            let ls = 22.5 + 1.1 * i_f + 0.3 * k_f;
            let lo = 9.5 + 0.4 * i_f + 0.55 * ((i + k) % 4) as f64;
            let noise = 0.05 * (((i * 7 + k * 3) % 5) as f64 - 2.0);
            let ahh = 60.0 + 0.35 * ls + 0.25 * lo + noise;
            let unmet = 30.0 - 0.6 * ls + 0.2 * lo - noise;
            rows.push((region.to_string(), year, ls.exp(), lo.exp(), ahh, unmet));
        }
    }
    rows
}

fn write_csv(rows: &[(String, i32, f64, f64, f64, f64)]) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    for (region, year, spending, output, ahh, unmet) in rows {
        writeln!(file, "{region},{year},{spending},{output},{ahh},{unmet}").unwrap();
    }
    file.flush().unwrap();
    file
}

fn load_synthetic() -> ObservationTable {
    let file = write_csv(&synthetic_rows());
    load_from_source(&DataSource::new(file.path(), "BENER"), NonPositivePolicy::Reject).unwrap()
}

/// Reference OLS via normal equations solved with Cramer's rule.
fn reference_fit(table: &ObservationTable, outcome: fn(&Observation) -> f64) -> [f64; 3] {
    let mut xtx = [[0.0f64; 3]; 3];
    let mut xty = [0.0f64; 3];
    for row in table.iter() {
        let x = [1.0, row.log_spending, row.log_output];
        for i in 0..3 {
            xty[i] += x[i] * outcome(row);
            for j in 0..3 {
                xtx[i][j] += x[i] * x[j];
            }
        }
    }
    let det = |m: &[[f64; 3]; 3]| {
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    };
    let d = det(&xtx);
    let mut beta = [0.0; 3];
    for (k, b) in beta.iter_mut().enumerate() {
        let mut m = xtx;
        for i in 0..3 {
            m[i][k] = xty[i];
        }
        *b = det(&m) / d;
    }
    beta
}

fn assert_close(actual: f64, expected: f64, rel: f64) {
    let scale = expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= rel * scale,
        "expected {expected}, got {actual}"
    );
}

fn assert_pairs_close(a: &CoefficientPair, b: &CoefficientPair, rel: f64) {
    for (pa, pb) in [
        (a.life_expectancy, b.life_expectancy),
        (a.unmet_need, b.unmet_need),
    ] {
        for (x, y) in pa.as_array().into_iter().zip(pb.as_array()) {
            assert_close(x, y, rel);
        }
    }
}

#[test]
fn csv_load_and_fit_matches_reference_ols() {
    let table = load_synthetic();
    assert_eq!(table.len(), 30);

    let pair = fit_dynamic(&table).unwrap();
    let ref_ahh = reference_fit(&table, |r| r.life_expectancy);
    let ref_unmet = reference_fit(&table, |r| r.unmet_need);

    for (got, want) in pair.life_expectancy.as_array().into_iter().zip(ref_ahh) {
        assert_close(got, want, 1e-6);
    }
    for (got, want) in pair.unmet_need.as_array().into_iter().zip(ref_unmet) {
        assert_close(got, want, 1e-6);
    }
}

#[test]
fn fit_is_deterministic() {
    let table = load_synthetic();
    assert_eq!(fit_dynamic(&table).unwrap(), fit_dynamic(&table).unwrap());
}

#[test]
fn fit_is_row_order_invariant() {
    let table = load_synthetic();
    let baseline = fit_dynamic(&table).unwrap();

    let mut rng = StdRng::seed_from_u64(211_024);
    for _ in 0..5 {
        let mut rows = table.rows().to_vec();
        rows.shuffle(&mut rng);
        let shuffled = fit_dynamic(&ObservationTable::new(rows)).unwrap();
        assert_pairs_close(&shuffled, &baseline, 1e-9);
    }
}

#[test]
fn noiseless_fixture_recovers_generating_coefficients() {
    let rows: Vec<_> = synthetic_rows()
        .into_iter()
        .map(|(region, year, spending, output, _, unmet)| {
            let ahh = 5.0 + 0.1 * spending.ln() + 0.2 * output.ln();
            (region, year, spending, output, ahh, unmet)
        })
        .collect();
    let file = write_csv(&rows);
    let table =
        load_from_source(&DataSource::new(file.path(), "BENER"), NonPositivePolicy::Reject)
            .unwrap();

    let ahh = fit_dynamic(&table).unwrap().life_expectancy;
    assert_close(ahh.intercept, 5.0, 1e-8);
    assert_close(ahh.coef_log_spending, 0.1, 1e-8);
    assert_close(ahh.coef_log_output, 0.2, 1e-8);
}

#[test]
fn filtered_subset_is_valid_fit_input() {
    let table = load_synthetic();
    let selection = spending_impact::Selection::new(
        vec!["Aceh".into(), "Bali".into(), "Jambi".into()],
        vec![2020, 2021],
    );
    let subset = table.filter(&selection);
    assert_eq!(subset.len(), 6);
    assert!(fit_dynamic(&subset).is_ok());

    let two = table.filter(&spending_impact::Selection::new(vec!["Aceh".into()], vec![2020, 2021]));
    assert!(matches!(
        fit_dynamic(&two),
        Err(PipelineError::InsufficientData { needed: 3, available: 2 })
    ));
}

#[test]
fn missing_rows_dropped_before_logs() {
    let text = format!(
        "{HEADER}\n\
         Aceh,2020,100,50,69.9,12.1\n\
         Bali,2020,200,60,71.2,10.4\n\
         Riau,2020,,55,70.0,11.0\n\
         Jambi,2020,120,40,70.1,13.3\n\
         Papua,2020,90,30,65.4,\n"
    );
    let raw = spending_impact::data_prep::source::read_csv_from(text.as_bytes()).unwrap();
    let table = load_observations(&raw).unwrap();
    let regions: Vec<&str> = table.iter().map(|r| r.region.as_str()).collect();
    assert_eq!(regions, vec!["Aceh", "Bali", "Jambi"]);
    assert!((table.rows()[0].log_spending - 100f64.ln()).abs() < 1e-12);
}

#[test]
fn non_positive_policy_boundary() {
    let text = format!("{HEADER}\nAceh,2020,100,50,69.9,12.1\nBali,2020,-1,60,71.2,10.4\n");
    let raw = spending_impact::data_prep::source::read_csv_from(text.as_bytes()).unwrap();

    assert!(matches!(
        prepare(&raw, NonPositivePolicy::Reject),
        Err(PipelineError::Domain { row: 1, .. })
    ));
    assert_eq!(prepare(&raw, NonPositivePolicy::Exclude).unwrap().len(), 1);
}

#[test]
fn missing_sheet_or_file_is_data_source_error() {
    let err = load_from_source(
        &DataSource::new("/definitely/not/here.xlsx", "BENER"),
        NonPositivePolicy::Reject,
    )
    .unwrap_err();
    assert!(matches!(err, PipelineError::DataSource(_)));
}

#[test]
fn static_and_dynamic_predictions_share_predict() {
    let input = (26.5, 11.0);
    let static_pair = static_params();
    assert_close(
        predict(&static_pair.life_expectancy, input.0, input.1),
        4.249795,
        1e-12,
    );

    let fitted = fit_dynamic(&load_synthetic()).unwrap();
    let manual = RegressionParams::new(
        fitted.life_expectancy.intercept,
        fitted.life_expectancy.coef_log_spending,
        fitted.life_expectancy.coef_log_output,
    );
    assert_eq!(
        predict(&fitted.life_expectancy, input.0, input.1),
        manual.intercept + manual.coef_log_spending * input.0 + manual.coef_log_output * input.1
    );
}
