// ============================================================================
// Structure : CheckoutSession
// ============================================================================
// Assistant de paiement en trois étapes :
//   1. Dados Pessoais  →  2. Pagamento  →  3. Confirmação
//
// CONCEPTS RUST :
// 1. Enum pour state machine : CheckoutStep remplace un compteur brut
// 2. Transitions gardées : chaque méthode vérifie l'étape ET les champs
//    avant de changer d'état, sinon renvoie une CheckoutError
// 3. Aucune perte de données : revenir en arrière ne vide aucun champ
// ============================================================================

use crate::api::is_valid_cep;
use crate::error::CheckoutError;
use crate::models::Plan;

// ============================================================================
// Enum : CheckoutStep
// ============================================================================

/// Étape courante du checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStep {
    /// Étape 1 : données personnelles (+ adresse optionnelle)
    Personal,
    /// Étape 2 : données de carte
    Payment,
    /// Étape 3 : achat confirmé
    Confirmation,
}

impl CheckoutStep {
    /// Numéro de l'étape (1..=3)
    pub fn number(&self) -> u8 {
        match self {
            CheckoutStep::Personal => 1,
            CheckoutStep::Payment => 2,
            CheckoutStep::Confirmation => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CheckoutStep::Personal => "Dados Pessoais",
            CheckoutStep::Payment => "Pagamento",
            CheckoutStep::Confirmation => "Confirmação",
        }
    }

    /// Champs saisissables à cette étape, dans l'ordre du formulaire
    pub fn fields(&self) -> &'static [CheckoutField] {
        match self {
            CheckoutStep::Personal => &[
                CheckoutField::Name,
                CheckoutField::Email,
                CheckoutField::Phone,
                CheckoutField::TaxId,
                CheckoutField::Cep,
                CheckoutField::Street,
                CheckoutField::Number,
                CheckoutField::Complement,
                CheckoutField::Neighborhood,
                CheckoutField::City,
                CheckoutField::State,
            ],
            CheckoutStep::Payment => &[
                CheckoutField::CardNumber,
                CheckoutField::CardName,
                CheckoutField::Expiry,
                CheckoutField::Cvv,
            ],
            CheckoutStep::Confirmation => &[],
        }
    }
}

// ============================================================================
// Enum : CheckoutField
// ============================================================================
// CONCEPT : Un champ = une variante
// - Permet à l'UI de naviguer entre les champs sans connaître la structure
// - field() / field_mut() font le lien avec les données
// ============================================================================

/// Champ du formulaire de checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutField {
    Name,
    Email,
    Phone,
    TaxId,
    Cep,
    Street,
    Number,
    Complement,
    Neighborhood,
    City,
    State,
    CardNumber,
    CardName,
    Expiry,
    Cvv,
}

impl CheckoutField {
    pub fn label(&self) -> &'static str {
        match self {
            CheckoutField::Name => "Nome completo",
            CheckoutField::Email => "Email",
            CheckoutField::Phone => "Telefone",
            CheckoutField::TaxId => "CPF",
            CheckoutField::Cep => "CEP",
            CheckoutField::Street => "Rua",
            CheckoutField::Number => "Número",
            CheckoutField::Complement => "Complemento",
            CheckoutField::Neighborhood => "Bairro",
            CheckoutField::City => "Cidade",
            CheckoutField::State => "Estado",
            CheckoutField::CardNumber => "Número do cartão",
            CheckoutField::CardName => "Nome no cartão",
            CheckoutField::Expiry => "Validade",
            CheckoutField::Cvv => "CVV",
        }
    }

    /// Texte d'aide affiché quand le champ est vide
    pub fn placeholder(&self) -> &'static str {
        match self {
            CheckoutField::Cep => "00000000",
            CheckoutField::CardNumber => "0000 0000 0000 0000",
            CheckoutField::Expiry => "MM/AA",
            CheckoutField::Cvv => "123",
            _ => "",
        }
    }

    /// Vrai si le champ bloque le passage à l'étape suivante
    pub fn is_required(&self) -> bool {
        matches!(
            self,
            CheckoutField::Name
                | CheckoutField::Email
                | CheckoutField::Phone
                | CheckoutField::TaxId
                | CheckoutField::CardNumber
                | CheckoutField::CardName
                | CheckoutField::Expiry
                | CheckoutField::Cvv
        )
    }

    /// Vérifie qu'un caractère peut être ajouté au champ
    ///
    /// `len` est la longueur actuelle du champ (en caractères).
    pub fn accepts(&self, c: char, len: usize) -> bool {
        match self {
            CheckoutField::Cep => c.is_ascii_digit() && len < 8,
            CheckoutField::CardNumber => c.is_ascii_digit() && len < 16,
            CheckoutField::Cvv => c.is_ascii_digit() && len < 4,
            CheckoutField::Expiry => (c.is_ascii_digit() || c == '/') && len < 5,
            CheckoutField::State => c.is_alphabetic() && len < 2,
            _ => !c.is_control(),
        }
    }
}

// ============================================================================
// Données du formulaire
// ============================================================================

/// Étape 1 : données personnelles
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonalInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    /// CPF
    pub tax_id: String,
}

/// Adresse (remplie en partie par la recherche de CEP)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    pub cep: String,
    pub street: String,
    pub number: String,
    pub complement: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
}

/// Résultat d'une recherche de CEP
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressLookup {
    pub street: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
}

/// Étape 2 : carte de paiement
///
/// Aucune validation réelle (Luhn, expiration) : seulement "non vide".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentInfo {
    pub card_number: String,
    pub card_name: String,
    pub expiry: String,
    pub cvv: String,
}

// ============================================================================
// Structure : CheckoutSession
// ============================================================================

/// Session de checkout pour un plan
///
/// Vit tant que l'écran Checkout est affiché, jamais persistée.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    /// Identifiant de session (pour écarter les résultats async périmés)
    pub id: u64,
    pub plan: Plan,
    step: CheckoutStep,
    pub personal: PersonalInfo,
    pub address: Address,
    pub payment: PaymentInfo,
    /// Paiement simulé en cours (étape 2, en attente du délai)
    processing: bool,
}

impl CheckoutSession {
    pub fn new(id: u64, plan: Plan) -> Self {
        Self {
            id,
            plan,
            step: CheckoutStep::Personal,
            personal: PersonalInfo::default(),
            address: Address::default(),
            payment: PaymentInfo::default(),
            processing: false,
        }
    }

    pub fn step(&self) -> CheckoutStep {
        self.step
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    /// Largeur de la barre de progression (33, 66, 100)
    pub fn progress_percent(&self) -> u16 {
        u16::from(self.step.number()) * 100 / 3
    }

    /// Lecture d'un champ
    pub fn field(&self, field: CheckoutField) -> &str {
        match field {
            CheckoutField::Name => &self.personal.name,
            CheckoutField::Email => &self.personal.email,
            CheckoutField::Phone => &self.personal.phone,
            CheckoutField::TaxId => &self.personal.tax_id,
            CheckoutField::Cep => &self.address.cep,
            CheckoutField::Street => &self.address.street,
            CheckoutField::Number => &self.address.number,
            CheckoutField::Complement => &self.address.complement,
            CheckoutField::Neighborhood => &self.address.neighborhood,
            CheckoutField::City => &self.address.city,
            CheckoutField::State => &self.address.state,
            CheckoutField::CardNumber => &self.payment.card_number,
            CheckoutField::CardName => &self.payment.card_name,
            CheckoutField::Expiry => &self.payment.expiry,
            CheckoutField::Cvv => &self.payment.cvv,
        }
    }

    /// Accès mutable à un champ
    ///
    /// CONCEPT RUST : &mut String
    /// - Retourne une référence mutable vers le champ de la bonne structure
    /// - Le borrow checker garantit qu'un seul champ est modifié à la fois
    pub fn field_mut(&mut self, field: CheckoutField) -> &mut String {
        match field {
            CheckoutField::Name => &mut self.personal.name,
            CheckoutField::Email => &mut self.personal.email,
            CheckoutField::Phone => &mut self.personal.phone,
            CheckoutField::TaxId => &mut self.personal.tax_id,
            CheckoutField::Cep => &mut self.address.cep,
            CheckoutField::Street => &mut self.address.street,
            CheckoutField::Number => &mut self.address.number,
            CheckoutField::Complement => &mut self.address.complement,
            CheckoutField::Neighborhood => &mut self.address.neighborhood,
            CheckoutField::City => &mut self.address.city,
            CheckoutField::State => &mut self.address.state,
            CheckoutField::CardNumber => &mut self.payment.card_number,
            CheckoutField::CardName => &mut self.payment.card_name,
            CheckoutField::Expiry => &mut self.payment.expiry,
            CheckoutField::Cvv => &mut self.payment.cvv,
        }
    }

    /// Ajoute un caractère à un champ s'il est accepté
    ///
    /// Retourne true si le champ a changé.
    pub fn push_char(&mut self, field: CheckoutField, c: char) -> bool {
        let len = self.field(field).chars().count();
        if !field.accepts(c, len) {
            return false;
        }
        let c = if field == CheckoutField::State {
            c.to_ascii_uppercase()
        } else {
            c
        };
        self.field_mut(field).push(c);
        true
    }

    /// Supprime le dernier caractère d'un champ
    pub fn pop_char(&mut self, field: CheckoutField) {
        self.field_mut(field).pop();
    }

    /// CEP complet (8 chiffres) prêt pour la recherche, sinon None
    pub fn cep_ready(&self) -> Option<&str> {
        let cep = self.address.cep.as_str();
        is_valid_cep(cep).then_some(cep)
    }

    /// Applique le résultat d'une recherche de CEP
    ///
    /// Ignoré si le champ CEP a changé entre-temps. Retourne true si
    /// l'adresse a été remplie.
    pub fn apply_address(&mut self, cep: &str, lookup: AddressLookup) -> bool {
        if self.address.cep != cep {
            return false;
        }
        self.address.street = lookup.street;
        self.address.neighborhood = lookup.neighborhood;
        self.address.city = lookup.city;
        self.address.state = lookup.state;
        true
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Champs obligatoires vides d'une étape
    fn missing_fields(&self, step: CheckoutStep) -> Vec<&'static str> {
        step.fields()
            .iter()
            .filter(|f| f.is_required() && self.field(**f).trim().is_empty())
            .map(|f| f.label())
            .collect()
    }

    /// Étape 1 → Étape 2
    ///
    /// Exige nom, email, téléphone et CPF non vides.
    pub fn advance_to_payment(&mut self) -> Result<(), CheckoutError> {
        if self.step != CheckoutStep::Personal {
            return Err(CheckoutError::WrongStep(self.step.number()));
        }
        let missing = self.missing_fields(CheckoutStep::Personal);
        if !missing.is_empty() {
            return Err(CheckoutError::MissingPersonalFields(missing));
        }
        self.step = CheckoutStep::Payment;
        Ok(())
    }

    /// Étape 2 → Étape 1, sans effacer aucun champ
    pub fn back_to_personal(&mut self) -> Result<(), CheckoutError> {
        if self.processing {
            return Err(CheckoutError::Processing);
        }
        if self.step != CheckoutStep::Payment {
            return Err(CheckoutError::WrongStep(self.step.number()));
        }
        self.step = CheckoutStep::Personal;
        Ok(())
    }

    /// Lance le paiement simulé
    ///
    /// Exige les quatre champs de carte non vides. Le passage à l'étape 3
    /// se fait ensuite via complete_payment(), après le délai simulé.
    pub fn submit_payment(&mut self) -> Result<(), CheckoutError> {
        if self.step != CheckoutStep::Payment {
            return Err(CheckoutError::WrongStep(self.step.number()));
        }
        if self.processing {
            return Err(CheckoutError::Processing);
        }
        let missing = self.missing_fields(CheckoutStep::Payment);
        if !missing.is_empty() {
            return Err(CheckoutError::MissingPaymentFields(missing));
        }
        self.processing = true;
        Ok(())
    }

    /// Fin du délai simulé : Étape 2 → Étape 3
    pub fn complete_payment(&mut self) -> Result<(), CheckoutError> {
        if self.step != CheckoutStep::Payment || !self.processing {
            return Err(CheckoutError::WrongStep(self.step.number()));
        }
        self.processing = false;
        self.step = CheckoutStep::Confirmation;
        Ok(())
    }
}

/// Groupe les chiffres d'une carte par 4 : "1234 5678 9012 3456"
pub fn format_card_number(number: &str) -> String {
    let digits: Vec<char> = number.chars().filter(|c| !c.is_whitespace()).collect();
    digits
        .chunks(4)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// Tests unitaires
// ============================================================================
