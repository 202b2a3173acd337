use crate::kpis::Kpis;

/// Narrative lines shown on the dashboard header.
pub fn insights(viewer: Option<&str>, kpis: &Kpis) -> Vec<String> {
    let viewer = viewer.map(str::trim).filter(|n| !n.is_empty()).unwrap_or("Administrador");
    vec![
        format!("Bienvenido, {viewer}. Iniciando auditoría..."),
        format!("Rendimiento actual: Se han procesado {} pedidos con éxito.", kpis.total_orders),
        format!("Alerta: {} productos están por debajo del stock mínimo.", kpis.low_stock_count),
        format!("Ingresos totales acumulados: {}.", kpis.total_revenue.format_bs()),
        format!("Análisis: El ticket promedio se mantiene en {}.", kpis.avg_ticket.format_bs()),
        format!("Seguridad: Hay {} usuarios autorizados operando el sistema.", kpis.total_users),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use papeleria_core::Money;

    #[test]
    fn greets_viewer_and_formats_money() {
        let kpis = Kpis {
            total_revenue: Money::from(1500),
            total_orders: 3,
            total_users: 2,
            avg_ticket: Money::from(500),
            low_stock_count: 1,
        };
        let lines = insights(Some("Ana"), &kpis);
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "Bienvenido, Ana. Iniciando auditoría...");
        assert_eq!(lines[3], "Ingresos totales acumulados: Bs. 1.500,00.");
        assert_eq!(insights(None, &kpis)[0], "Bienvenido, Administrador. Iniciando auditoría...");
    }
}
