use serde_json::{Map, Value};

use crate::multipart::PostFields;

/// How domain control is validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DcvType {
    Email,
    File,
    Dns,
}

impl DcvType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DcvType::Email => "EMAIL_VALIDATION",
            DcvType::File => "FILE_VALIDATION",
            DcvType::Dns => "DNS_VALIDATION",
        }
    }
}

/// Per-domain validation settings for a multi-domain certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DcvDomain {
    pub domain: String,
    pub dcv_type: DcvType,

    /// Required with [`DcvType::Email`].
    pub approver_email: Option<String>,
}

impl DcvDomain {
    pub fn new(domain: impl Into<String>, dcv_type: DcvType) -> Self {
        DcvDomain {
            domain: domain.into(),
            dcv_type,
            approver_email: None,
        }
    }

    pub fn approver_email(mut self, email: impl Into<String>) -> Self {
        self.approver_email = Some(email.into());
        self
    }

    fn to_json(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("domain".to_owned(), Value::from(self.domain.as_str()));
        obj.insert("dcvType".to_owned(), Value::from(self.dcv_type.as_str()));

        if let Some(email) = &self.approver_email {
            obj.insert("approverEmail".to_owned(), Value::from(email.as_str()));
        }

        Value::Object(obj)
    }
}

/// Parameters for [`Certificate::renew()`](crate::certificate::Certificate::renew).
///
/// Product, validity, CSR and validation type are required. Everything else is only sent when
/// set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenewRequest {
    product: u64,
    years: u32,
    csr: String,
    dcv_type: DcvType,
    subject_alternative_names: Vec<String>,
    dcv: Vec<DcvDomain>,
    company: Option<String>,
    department: Option<String>,
    address: Option<String>,
    zipcode: Option<String>,
    city: Option<String>,
    approver_first_name: Option<String>,
    approver_last_name: Option<String>,
    approver_email: Option<String>,
    approver_phone: Option<String>,
    kvk: Option<String>,
    reference: Option<String>,
    unique_value_dcv: Option<String>,
}

macro_rules! optional_fields {
    ($($(#[$doc:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$doc])*
            pub fn $name(mut self, value: impl Into<String>) -> Self {
                self.$name = Some(value.into());
                self
            }
        )*
    };
}

impl RenewRequest {
    pub fn new(product: u64, years: u32, csr: impl Into<String>, dcv_type: DcvType) -> Self {
        RenewRequest {
            product,
            years,
            csr: csr.into(),
            dcv_type,
            subject_alternative_names: Vec::new(),
            dcv: Vec::new(),
            company: None,
            department: None,
            address: None,
            zipcode: None,
            city: None,
            approver_first_name: None,
            approver_last_name: None,
            approver_email: None,
            approver_phone: None,
            kvk: None,
            reference: None,
            unique_value_dcv: None,
        }
    }

    pub fn add_subject_alternative_name(mut self, name: impl Into<String>) -> Self {
        self.subject_alternative_names.push(name.into());
        self
    }

    pub fn add_dcv(mut self, dcv: DcvDomain) -> Self {
        self.dcv.push(dcv);
        self
    }

    optional_fields! {
        company,
        department,
        address,
        zipcode,
        city,
        approver_first_name,
        approver_last_name,
        approver_email,
        approver_phone,
        /// Dutch Chamber of Commerce number.
        kvk,
        /// Free-form reference shown on invoices.
        reference,
        /// Value used in file and DNS validation. Sent even when empty.
        unique_value_dcv,
    }

    pub fn subject_alternative_names(&self) -> &[String] {
        &self.subject_alternative_names
    }

    pub fn dcv(&self) -> &[DcvDomain] {
        &self.dcv
    }

    /// The form fields for the renew call, in the order the API documents them.
    pub fn to_fields(&self) -> PostFields {
        let mut fields = PostFields::new();

        fields
            .push("product", self.product)
            .push("years", self.years)
            .push("csr", &self.csr)
            .push("dcvType", self.dcv_type.as_str());

        if !self.subject_alternative_names.is_empty() {
            fields.push(
                "subjectAlternativeNames",
                self.subject_alternative_names.join(","),
            );
        }

        if !self.dcv.is_empty() {
            let dcv = Value::Array(self.dcv.iter().map(DcvDomain::to_json).collect());
            fields.push("dcv", dcv.to_string());
        }

        fields
            .push_opt("company", self.company.as_ref())
            .push_opt("department", self.department.as_ref())
            .push_opt("address", self.address.as_ref())
            .push_opt("zipcode", self.zipcode.as_ref())
            .push_opt("city", self.city.as_ref())
            .push_opt("approverFirstName", self.approver_first_name.as_ref())
            .push_opt("approverLastName", self.approver_last_name.as_ref())
            .push_opt("approverEmail", self.approver_email.as_ref())
            .push_opt("approverPhone", self.approver_phone.as_ref())
            .push_opt("kvk", self.kvk.as_ref())
            .push_opt("reference", self.reference.as_ref());

        if let Some(unique_value) = &self.unique_value_dcv {
            fields.push("uniqueValueDcv", unique_value);
        }

        fields
    }
}
