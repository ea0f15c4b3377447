use cashflow_forecast::*;
use chrono::NaiveDate;

fn export_to_csv(series: &ForecastSeries) -> anyhow::Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["Month", "Income", "Expense", "Balance", "Origin"])?;

    for i in 0..12 {
        writer.write_record([
            series.month_labels[i].clone(),
            format!("{:.2}", series.income[i]),
            format!("{:.2}", series.expense[i]),
            format!("{:.2}", series.balance[i]),
            format!("{:?}", series.origins[i]),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

fn invoices(year: i32, month: u32, amounts: &[f64]) -> Vec<Transaction> {
    amounts
        .iter()
        .enumerate()
        .map(|(i, &amount)| {
            let date = NaiveDate::from_ymd_opt(year, month, i as u32 + 1).unwrap();
            Transaction::dated(date, amount, None)
        })
        .collect()
}

fn assert_balance_identity(series: &ForecastSeries) {
    assert_eq!(series.income.len(), 12);
    assert_eq!(series.expense.len(), 12);
    assert_eq!(series.balance.len(), 12);
    for i in 0..12 {
        assert_eq!(
            series.balance[i],
            series.income[i] - series.expense[i],
            "balance identity broken for {}",
            series.month_labels[i]
        );
    }
}

#[test]
fn test_single_january_month_projects_constant_income() {
    let input = ForecastInput {
        emitted: invoices(2024, 1, &[500.0, 700.0, 800.0, 1000.0, 1000.0]),
        received: Vec::new(),
        include_global_invoices: false,
    };

    let series = ForecastEngine::default().forecast(&input, &mut FixedSampler(0.0));

    assert_eq!(series.last_observed_month_index, 0);
    assert_eq!(series.income[0], 4000.0);
    assert_eq!(series.expense[0], 0.0);
    assert_eq!(series.balance[0], 4000.0);

    for i in 1..12 {
        assert_eq!(series.origins[i], MonthOrigin::Projected);
        assert_eq!(series.income[i], 4000.0, "{}", series.month_labels[i]);
        assert_eq!(series.expense[i], 0.0, "{}", series.month_labels[i]);
    }
    assert_balance_identity(&series);
}

#[test]
fn test_sparse_income_with_sufficient_expense() {
    let input = ForecastInput {
        emitted: invoices(2024, 5, &[100.0, 200.0, 300.0]),
        received: invoices(2024, 5, &[50.0; 6]),
        include_global_invoices: false,
    };

    let series = ForecastEngine::default().forecast(&input, &mut FixedSampler(0.5));

    assert_eq!(series.last_observed_month_index, 4);
    assert_eq!(series.origins[4], MonthOrigin::Actual);
    assert_eq!(series.income[4], 0.0);
    assert!((series.expense[4] - 300.0).abs() < 1e-9);
    assert!((series.balance[4] + 300.0).abs() < 1e-9);
    for i in 0..4 {
        assert_eq!(series.origins[i], MonthOrigin::Gap);
    }
    assert_balance_identity(&series);
}

#[test]
fn test_toggling_global_invoices_only_affects_income() {
    let mut emitted = invoices(2024, 3, &[1000.0; 5]);
    emitted.extend(
        invoices(2024, 3, &[250.0, 250.0])
            .into_iter()
            .map(|t| t.with_counterparty("xaxx010101000")),
    );
    emitted.push(Transaction::new("15/04/2024", 75.0).with_counterparty(GENERIC_FOREIGN_ID));
    let received = invoices(2024, 3, &[120.0; 5]);

    let mut input = ForecastInput {
        emitted,
        received,
        include_global_invoices: false,
    };

    let excluding = ForecastEngine::default().forecast(&input, &mut FixedSampler(0.5));
    input.include_global_invoices = true;
    let including = ForecastEngine::default().forecast(&input, &mut FixedSampler(0.5));

    assert_eq!(excluding.excluded_count, 3);
    assert!((excluding.excluded_amount - 575.0).abs() < 1e-9);
    assert_eq!(including.excluded_count, 0);
    assert_eq!(including.excluded_amount, 0.0);

    assert!((excluding.income[2] - 5000.0).abs() < 1e-9);
    assert!((including.income[2] - 5500.0).abs() < 1e-9);
    assert_eq!(excluding.expense[2], including.expense[2]);
    assert!((excluding.expense[2] - 600.0).abs() < 1e-9);

    // April has a single income invoice either way, which is below the threshold
    assert_eq!(excluding.last_observed_month_index, 2);
    assert_eq!(including.last_observed_month_index, 2);

    assert_balance_identity(&excluding);
    assert_balance_identity(&including);
}

#[test]
fn test_malformed_dates_are_ignored() {
    let mut emitted = invoices(2024, 2, &[200.0; 5]);
    emitted.push(Transaction::new("", 9_999.0));
    emitted.push(Transaction::new("—", 9_999.0));
    emitted.push(Transaction::new("2024-02-10", 9_999.0));

    let input = ForecastInput {
        emitted,
        received: Vec::new(),
        include_global_invoices: false,
    };
    let series = ForecastEngine::default().forecast(&input, &mut FixedSampler(0.5));

    assert!((series.income[1] - 1000.0).abs() < 1e-9);
    assert_eq!(series.last_observed_month_index, 1);
}

#[test]
fn test_empty_input_produces_zero_series() {
    let input = ForecastInput::default();
    let series = ForecastEngine::default().forecast(&input, &mut FixedSampler(1.0));

    assert_eq!(
        series.last_observed_month_index,
        DEFAULT_FALLBACK_LAST_OBSERVED_MONTH as usize - 1
    );
    assert!(series.income.iter().all(|v| *v == 0.0));
    assert!(series.expense.iter().all(|v| *v == 0.0));
    assert_eq!(series.totals().balance, 0.0);
    assert_balance_identity(&series);
}

#[test]
fn test_projections_never_negative_under_falling_trend() {
    let mut emitted = Vec::new();
    let mut received = Vec::new();
    for (month, amount) in [(1, 900.0), (2, 600.0), (3, 300.0)] {
        emitted.extend(invoices(2024, month, &[amount; 5]));
        received.extend(invoices(2024, month, &[amount / 2.0; 5]));
    }
    let input = ForecastInput {
        emitted,
        received,
        include_global_invoices: true,
    };

    for draw in [0.0, 0.25, 0.5, 0.75, 0.999] {
        let series = ForecastEngine::default().forecast(&input, &mut FixedSampler(draw));
        for i in 3..12 {
            assert!(series.income[i] >= 0.0, "income negative at {}", i);
            assert!(series.expense[i] >= 0.0, "expense negative at {}", i);
        }
        assert_balance_identity(&series);
    }

    let mut sampler = RngSampler::thread();
    for _ in 0..50 {
        let series = ForecastEngine::default().forecast(&input, &mut sampler);
        assert!(series.income.iter().all(|v| *v >= 0.0));
        assert!(series.expense.iter().all(|v| *v >= 0.0));
    }
}

#[test]
fn test_custom_config_from_json() {
    let config = ForecastConfig::from_json_str(
        r#"{ "sufficiency_threshold": 2, "regression_window": 2, "noise_factor": 0.0 }"#,
    )
    .unwrap();

    let mut emitted = invoices(2024, 1, &[100.0, 100.0]);
    emitted.extend(invoices(2024, 2, &[500.0, 500.0]));
    emitted.extend(invoices(2024, 3, &[700.0, 700.0]));
    let input = ForecastInput {
        emitted,
        received: Vec::new(),
        include_global_invoices: false,
    };

    let series = ForecastProcessor::process(&input, &config).unwrap();

    // window is Feb and Mar only: 1000 -> 1400
    assert_eq!(series.income_trend.history_length, 2);
    assert!((series.income_trend.slope - 400.0).abs() < 1e-9);
    assert!((series.income[3] - 1800.0).abs() < 1e-9);
    assert!((series.income[11] - 5000.0).abs() < 1e-9);
}

#[test]
fn test_totals_and_axis_range() {
    let mut emitted = Vec::new();
    let mut received = Vec::new();
    for month in 1..=12 {
        emitted.extend(invoices(2024, month, &[1000.0; 5]));
        received.extend(invoices(2024, month, &[1200.0; 5]));
    }
    let input = ForecastInput {
        emitted,
        received,
        include_global_invoices: false,
    };

    let series = ForecastEngine::default().forecast(&input, &mut FixedSampler(0.5));
    assert_eq!(series.projected_months(), 0);

    let totals = series.totals();
    assert!((totals.income - 60_000.0).abs() < 1e-6);
    assert!((totals.expense - 72_000.0).abs() < 1e-6);
    assert!((totals.balance + 12_000.0).abs() < 1e-6);
    assert_eq!(totals, series.actual_totals());

    // values span -1000..6000
    let axis = AxisRange::for_forecast(&series);
    assert_eq!(axis.min, -2000.0);
    assert_eq!(axis.max, 7000.0);
    assert_eq!(axis.step_size, 1000.0);
}

#[test]
fn test_csv_export() {
    let input = ForecastInput {
        emitted: invoices(2024, 6, &[300.0; 5]),
        received: invoices(2024, 6, &[100.0; 5]),
        include_global_invoices: false,
    };
    let series = ForecastEngine::default().forecast(&input, &mut FixedSampler(0.5));

    let csv = export_to_csv(&series).unwrap();
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines.len(), 13);
    assert_eq!(lines[0], "Month,Income,Expense,Balance,Origin");
    assert_eq!(lines[1], "Ene,0.00,0.00,0.00,Gap");
    assert_eq!(lines[6], "Jun,1500.00,500.00,1000.00,Actual");
    assert_eq!(lines[12], "Dic,1500.00,500.00,1000.00,Projected");
}

#[test]
fn test_series_serializes_to_json() {
    let input = ForecastInput {
        emitted: invoices(2024, 8, &[10.0; 5]),
        received: Vec::new(),
        include_global_invoices: false,
    };
    let series = ForecastEngine::default().forecast(&input, &mut FixedSampler(0.5));

    let json = serde_json::to_string(&series).unwrap();
    assert!(json.contains("\"month_labels\""));
    assert!(json.contains("\"Ago\""));
    assert!(json.contains("\"last_observed_month_index\":7"));

    let back: ForecastSeries = serde_json::from_str(&json).unwrap();
    assert_eq!(back.income, series.income);
}
