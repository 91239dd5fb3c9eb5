use crate::feed::types::{CategoryPerformance, CorporateDashboard, Kpi};

#[derive(Debug, Clone, Default)]
pub struct CorporateView {
    dashboard: CorporateDashboard,
}

impl CorporateView {
    pub fn new(dashboard: CorporateDashboard) -> Self {
        Self { dashboard }
    }

    pub fn kpis(&self) -> &[Kpi] {
        &self.dashboard.kpis
    }

    pub fn performance(&self) -> &[CategoryPerformance] {
        &self.dashboard.performance
    }

    /// Spoilage value over sales. `None` for unknown categories or zero sales.
    pub fn spoilage_rate(&self, category: &str) -> Option<f64> {
        self.dashboard
            .performance
            .iter()
            .find(|p| p.category == category)
            .and_then(rate)
    }

    /// Category with the highest spoilage rate.
    pub fn worst_category(&self) -> Option<&CategoryPerformance> {
        self.dashboard
            .performance
            .iter()
            .filter_map(|p| rate(p).map(|r| (p, r)))
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(p, _)| p)
    }
}

fn rate(p: &CategoryPerformance) -> Option<f64> {
    (p.sales > 0.0).then(|| p.spoilage / p.sales)
}
