use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::books::list_books,
        api::books::create_book,
        api::books::get_book,
        api::books::update_book,
        api::books::delete_book,
        api::members::list_members,
        api::members::create_member,
        api::members::get_member,
        api::members::update_member,
        api::members::delete_member,
        api::loan::check_out,
        api::loan::preview_checkin,
        api::loan::check_in,
        api::loan::renew,
        api::loan::list_loans,
        api::loan::get_loan,
        api::loan::pay_fine,
        api::loan::purge_loans,
        api::holds::list_holds,
        api::holds::place_hold,
        api::holds::cancel_hold,
        api::reports::summary,
        api::reports::overdue,
        api::reports::fines,
    ),
    tags(
        (name = "school-library", description = "School library circulation API")
    )
)]
pub struct ApiDoc;
