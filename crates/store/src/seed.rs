//! Demo projects written into a fresh data file.

use folio_core::project::Project;
use folio_core::types::DbId;

/// The six projects a brand-new file-backed store starts with when seeding
/// is enabled.
pub fn demo_projects() -> Vec<Project> {
    let project = |id: DbId, name: &str, project_type: &str, area: &str, modules: &[&str]| Project {
        id,
        name: name.to_string(),
        project_type: project_type.to_string(),
        area: area.to_string(),
        modules: modules.iter().map(|m| m.to_string()).collect(),
        created_at: None,
    };

    vec![
        project(
            1,
            "Sistema Integral de Gestión de Análisis Empresarial",
            "REPORTE",
            "Sistemas",
            &[
                "MODULO DE FACTURACION",
                "MODULO DE CIERRE OPERATIVO",
                "MODULO DE NUMEROS DE CARTERA",
            ],
        ),
        project(
            2,
            "Proyecto SENCILLO",
            "REPORTE",
            "Analistas",
            &[
                "MODULO DE (SUSPENSIONES PRIMERA VEZ)",
                "MODULO DE (BANCO DE SEGUNDO RANGO)",
            ],
        ),
        project(
            3,
            "Proyecto Nuevas Acometidas y Almacen",
            "REPORTE",
            "Soporte",
            &[
                "MODULO DE (PRODUCCION NUEVAS ACOMETIDAS)",
                "MODULO DE ALMACEN (RECUENTO DE MATERIALES Y PROCESOS)",
            ],
        ),
        project(
            4,
            "INVENTORYPRO - SISTEMA DE CONTROL DE MATERIALES",
            "SISTEMA",
            "Desarrollo",
            &[],
        ),
        project(
            5,
            "Admiistrativo",
            "REPORTE",
            "Auxiliares",
            &[
                "DASHBOARD DE CONTROL DE CREDITOS",
                "DESARROLLO DEL SICC (SISTEMA INTEGRAL DE CONTROL DE CREDITOS)",
            ],
        ),
        project(
            6,
            "Proyecto Gases del caribe",
            "REPORTE",
            "Sistemas",
            &[
                "MODULO DE (ORDENES)",
                "MODULO DE (PERIODOS)",
                "MODULO DE (GESTION OPERATIVA Y DESEMPEÑO DE GESTORES)",
                "MODULO DE (ANALISIS DE PRODUCCION Y FACTURACION)",
                "MODULO DE (CAUSALES)",
                "MODULO DE (FACTURACION)",
                "MODULO DE (CIERRE OPERATIVO)",
            ],
        ),
    ]
}
