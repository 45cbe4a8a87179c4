// ============================================================================
// Structure : Plan
// ============================================================================
// Catalogue des plans d'abonnement affichés sur l'écran Planos
//
// CONCEPTS RUST :
// 1. Catalogue statique : les plans sont connus à la compilation
// 2. FromStr : parser l'identifiant reçu dans la route (?plano=premium)
// 3. Option : un identifiant inconnu donne None (redirection vers Planos)
// ============================================================================

use std::str::FromStr;

use rust_decimal::Decimal;

/// Identifiant d'un plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlanId {
    Pro,
    Premium,
    Anual,
}

impl PlanId {
    /// Ordre d'affichage des cartes
    pub const ALL: [PlanId; 3] = [PlanId::Pro, PlanId::Premium, PlanId::Anual];

    /// Identifiant tel qu'il apparaît dans la route
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanId::Pro => "pro",
            PlanId::Premium => "premium",
            PlanId::Anual => "anual",
        }
    }

    /// Plan complet correspondant à cet identifiant
    pub fn plan(&self) -> Plan {
        match self {
            PlanId::Pro => Plan {
                id: PlanId::Pro,
                name: "Plano PRO",
                price: Decimal::from(29),
                period: "mês",
                description: "Ideal para quem está começando",
                features: &[
                    "Controle de gastos ilimitado",
                    "Relatórios detalhados",
                    "Suporte por email",
                ],
                badge: None,
            },
            PlanId::Premium => Plan {
                id: PlanId::Premium,
                name: "Plano Premium",
                price: Decimal::from(49),
                period: "mês",
                description: "Mais popular - Recursos completos",
                features: &[
                    "Todos os recursos PRO",
                    "Investimentos automatizados",
                    "Consultoria personalizada",
                    "Suporte prioritário 24/7",
                ],
                badge: Some("MAIS POPULAR"),
            },
            PlanId::Anual => Plan {
                id: PlanId::Anual,
                name: "Plano Anual",
                price: Decimal::from(399),
                period: "ano",
                description: "Economize 32% - Melhor custo-benefício",
                features: &[
                    "Todos os recursos Premium",
                    "Relatórios avançados",
                    "Treinamentos exclusivos",
                    "Desconto vitalício",
                ],
                badge: Some("Economize 32%"),
            },
        }
    }
}

impl FromStr for PlanId {
    type Err = String;

    /// Insensible à la casse et aux espaces autour
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pro" => Ok(PlanId::Pro),
            "premium" => Ok(PlanId::Premium),
            "anual" => Ok(PlanId::Anual),
            other => Err(format!("plano desconhecido: {}", other)),
        }
    }
}

/// Un plan d'abonnement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub id: PlanId,
    pub name: &'static str,
    pub price: Decimal,
    /// "mês" ou "ano"
    pub period: &'static str,
    pub description: &'static str,
    pub features: &'static [&'static str],
    /// Mise en avant sur la carte ("MAIS POPULAR", ...)
    pub badge: Option<&'static str>,
}

impl Plan {
    /// Cherche un plan par identifiant textuel
    ///
    /// None si l'identifiant est absent du catalogue.
    pub fn find(id: &str) -> Option<Plan> {
        id.parse::<PlanId>().ok().map(|plan_id| plan_id.plan())
    }

    /// Tous les plans, dans l'ordre d'affichage
    pub fn catalog() -> Vec<Plan> {
        PlanId::ALL.iter().map(PlanId::plan).collect()
    }

    /// Total affiché dans le résumé de commande (pas de taxes ni de remise)
    pub fn total(&self) -> Decimal {
        self.price
    }
}
