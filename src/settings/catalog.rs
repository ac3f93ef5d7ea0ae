// ABOUTME: Default site settings of the clinic website used to seed an empty table
// ABOUTME: Also the source of number defaults applied when a number edit is left empty
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::types::{SettingRow, SettingType};
use std::collections::HashMap;

/// Seed rows for a new clinic site, in display order
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn default_rows() -> Vec<SettingRow> {
    vec![
        // General
        SettingRow::new("site.title", "Site title", "general", SettingType::Text, "Our Clinic")
            .describe("Shown in the browser tab and the page header")
            .public(),
        SettingRow::new(
            "site.tagline",
            "Tagline",
            "general",
            SettingType::Text,
            "Caring for your family",
        )
        .public(),
        SettingRow::new("site.about", "About the clinic", "general", SettingType::Textarea, "")
            .describe("Paragraph on the home page")
            .public(),
        SettingRow::new(
            "site.maintenance_mode",
            "Maintenance mode",
            "general",
            SettingType::Boolean,
            "false",
        )
        .describe("Replaces the public site with a maintenance notice"),
        // Appearance
        SettingRow::new("appearance.logo", "Logo", "appearance", SettingType::Image, "")
            .describe("PNG, JPEG, GIF, WebP or SVG")
            .public(),
        SettingRow::new("appearance.favicon", "Favicon", "appearance", SettingType::Image, "")
            .public(),
        SettingRow::new(
            "appearance.primary_color",
            "Primary color",
            "appearance",
            SettingType::Color,
            "#0a7cff",
        )
        .public(),
        SettingRow::new(
            "appearance.accent_color",
            "Accent color",
            "appearance",
            SettingType::Color,
            "#10b981",
        )
        .public(),
        // Contact
        SettingRow::new("contact.phone", "Phone", "contact", SettingType::Text, "").public(),
        SettingRow::new("contact.email", "Email", "contact", SettingType::Text, "").public(),
        SettingRow::new("contact.address", "Address", "contact", SettingType::Textarea, "")
            .public(),
        SettingRow::new(
            "contact.opening_hours",
            "Opening hours",
            "contact",
            SettingType::Textarea,
            "Mon-Fri 08:00-18:00",
        )
        .public(),
        // Booking
        SettingRow::new(
            "booking.online_enabled",
            "Online booking",
            "booking",
            SettingType::Boolean,
            "true",
        )
        .describe("Show the appointment form on the public site")
        .public(),
        SettingRow::new(
            "booking.slot_minutes",
            "Appointment length (minutes)",
            "booking",
            SettingType::Number,
            NUMBER_DEFAULTS[0].1,
        ),
        SettingRow::new(
            "booking.lead_time_hours",
            "Minimum notice (hours)",
            "booking",
            SettingType::Number,
            NUMBER_DEFAULTS[1].1,
        )
        .describe("How far ahead patients must book"),
        SettingRow::new(
            "booking.max_days_ahead",
            "Booking window (days)",
            "booking",
            SettingType::Number,
            NUMBER_DEFAULTS[2].1,
        ),
        // SEO
        SettingRow::new("seo.meta_title", "Meta title", "seo", SettingType::Text, "").public(),
        SettingRow::new(
            "seo.meta_description",
            "Meta description",
            "seo",
            SettingType::Textarea,
            "",
        )
        .public(),
        SettingRow::new("seo.share_image", "Social share image", "seo", SettingType::Image, "")
            .public(),
    ]
}

const NUMBER_DEFAULTS: [(&str, &str); 3] = [
    ("booking.slot_minutes", "30"),
    ("booking.lead_time_hours", "24"),
    ("booking.max_days_ahead", "60"),
];

/// Value a number setting falls back to when its input is left empty
#[must_use]
pub fn number_defaults() -> HashMap<String, String> {
    NUMBER_DEFAULTS
        .iter()
        .map(|&(key, value)| (key.to_owned(), value.to_owned()))
        .collect()
}
