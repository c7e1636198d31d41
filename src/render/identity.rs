use serde::Serialize;

/// Business details printed on every bill. Compiled in; not part of a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BusinessIdentity {
    pub name: &'static str,
    pub address: [&'static str; 2],
    pub mobile: &'static str,
    pub email: &'static str,
    pub customer_care: &'static str,
    pub instagram: &'static str,
}

pub const FARM: BusinessIdentity = BusinessIdentity {
    name: "KANHA'S MILK & GOAT FARM",
    address: [
        "C/O: Natraj Residency C-8, Chavan Nagar, Dhankawadi,",
        "Pune, 411043",
    ],
    mobile: "7038097938",
    email: "kanhasmilk@gmail.com",
    customer_care: "+91 9689203696",
    instagram: "kanhas_milk",
};
