//! Core types for Handlekurv.
//!
//! This module provides type-safe wrappers and records for the catalog,
//! the user profile and recipe recommendations.

pub mod catalog;
pub mod id;
pub mod profile;
pub mod recipe;
pub mod units;

pub use catalog::{
    Allergen, Nutrition, OpeningHours, Page, PageLinks, PageMeta, PhysicalStore, Position,
    PricePoint, Product, Sale, SaleKind, StoreRef,
};
pub use id::*;
pub use profile::{ActivityLevel, Gender, Objective, Profile, ProfileError, ProfileErrors, ProfileForm};
pub use recipe::{Recipe, RecommendationRequest, RecommendedRecipes};
pub use units::{Co2Kg, Kroner};
