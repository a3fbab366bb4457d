//! # Views
//!
//! Server-rendered HTML for the Create form.
//!
//! The form is rendered on `GET /Product/Create` (empty) and again on a
//! `POST /Product/Create` that failed validation, with the submitted
//! values and the messages for every failing field. maud escapes all
//! interpolated values.

use maud::{html, Markup, DOCTYPE};

use crate::antiforgery::FORM_FIELD;
use catalog_core::{
    CandidateProduct, ValidationErrors, MAX_DESCRIPTION_LEN, MAX_IMAGE_URL_LEN, MAX_NAME_LEN,
};

/// What the Create form shows: field values and their errors.
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    pub values: CandidateProduct,
    pub errors: ValidationErrors,
}

impl ProductForm {
    /// A blank form with no errors.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A form re-presenting rejected input.
    pub fn rejected(values: CandidateProduct, errors: ValidationErrors) -> Self {
        ProductForm { values, errors }
    }
}

/// Full page for the Create form.
pub fn create_page(form: &ProductForm, token: &str) -> Markup {
    let values = &form.values;

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { "Create product" }
            }
            body {
                h1 { "Create product" }

                @if !form.errors.is_empty() {
                    div class="validation-summary" role="alert" {
                        ul {
                            @for error in form.errors.iter() {
                                li { (error.to_string()) }
                            }
                        }
                    }
                }

                form method="post" action="/Product/Create" {
                    input type="hidden" name=(FORM_FIELD) value=(token);

                    (text_field(form, "name", "Name", values.name.as_deref(), MAX_NAME_LEN))

                    div class="field" {
                        label for="description" { "Description" }
                        textarea id="description" name="description"
                            maxlength=(MAX_DESCRIPTION_LEN) required {
                            (values.description.as_deref().unwrap_or_default())
                        }
                        (field_errors(form, "description"))
                    }

                    div class="field" {
                        label for="price" { "Price" }
                        input id="price" name="price" type="text" inputmode="decimal" required
                            value=(values.price.as_deref().unwrap_or_default());
                        (field_errors(form, "price"))
                    }

                    (text_field(
                        form,
                        "imageUrl",
                        "Image URL",
                        values.image_url.as_deref(),
                        MAX_IMAGE_URL_LEN,
                    ))

                    button type="submit" { "Create" }
                }
            }
        }
    }
}

fn text_field(
    form: &ProductForm,
    name: &str,
    label: &str,
    value: Option<&str>,
    max: usize,
) -> Markup {
    html! {
        div class="field" {
            label for=(name) { (label) }
            input id=(name) name=(name) type="text" maxlength=(max)
                value=(value.unwrap_or_default());
            (field_errors(form, name))
        }
    }
}

fn field_errors(form: &ProductForm, field: &str) -> Markup {
    html! {
        @for message in form.errors.messages_for(field) {
            span class="field-error" data-field=(field) { (message) }
        }
    }
}
