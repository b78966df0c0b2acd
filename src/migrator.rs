use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250501_000001_create_ordenes_compra_table::Migration),
            Box::new(m20250501_000002_create_facturas_table::Migration),
        ]
    }
}

mod m20250501_000001_create_ordenes_compra_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250501_000001_create_ordenes_compra_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(OrdenesCompra::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(OrdenesCompra::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(OrdenesCompra::NumeroOrden)
                                .string_len(50)
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(OrdenesCompra::NombreProveedor)
                                .string_len(200)
                                .not_null(),
                        )
                        .col(ColumnDef::new(OrdenesCompra::EmailProveedor).string().null())
                        .col(
                            ColumnDef::new(OrdenesCompra::TelefonoProveedor)
                                .string_len(20)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(OrdenesCompra::MontoTotal)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(ColumnDef::new(OrdenesCompra::Moneda).string_len(3).not_null())
                        .col(ColumnDef::new(OrdenesCompra::Estado).string_len(20).not_null())
                        .col(ColumnDef::new(OrdenesCompra::FechaOrden).date().not_null())
                        .col(
                            ColumnDef::new(OrdenesCompra::FechaEntregaEsperada)
                                .date()
                                .null(),
                        )
                        .col(ColumnDef::new(OrdenesCompra::Notas).string_len(1000).null())
                        .col(ColumnDef::new(OrdenesCompra::UrlDocumento).text().null())
                        .col(
                            ColumnDef::new(OrdenesCompra::CreadoEn)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(OrdenesCompra::ActualizadoEn)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_ordenes_compra_estado")
                        .table(OrdenesCompra::Table)
                        .col(OrdenesCompra::Estado)
                        .if_not_exists()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(OrdenesCompra::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum OrdenesCompra {
        Table,
        Id,
        NumeroOrden,
        NombreProveedor,
        EmailProveedor,
        TelefonoProveedor,
        MontoTotal,
        Moneda,
        Estado,
        FechaOrden,
        FechaEntregaEsperada,
        Notas,
        UrlDocumento,
        CreadoEn,
        ActualizadoEn,
    }
}

mod m20250501_000002_create_facturas_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250501_000002_create_facturas_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Facturas::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Facturas::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Facturas::NumeroFactura)
                                .string_len(50)
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Facturas::OrdenCompraId).uuid().not_null())
                        .col(
                            ColumnDef::new(Facturas::NombreVendedor)
                                .string_len(200)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Facturas::EmailVendedor).string().null())
                        .col(ColumnDef::new(Facturas::TelefonoVendedor).string_len(20).null())
                        .col(
                            ColumnDef::new(Facturas::MontoTotal)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Facturas::Moneda).string_len(3).not_null())
                        .col(ColumnDef::new(Facturas::Estado).string_len(20).not_null())
                        .col(ColumnDef::new(Facturas::FechaFactura).date().not_null())
                        .col(ColumnDef::new(Facturas::FechaVencimiento).date().null())
                        .col(ColumnDef::new(Facturas::FechaPago).date().null())
                        .col(ColumnDef::new(Facturas::Notas).string_len(1000).null())
                        .col(ColumnDef::new(Facturas::UrlDocumento).text().null())
                        .col(
                            ColumnDef::new(Facturas::CreadoEn)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Facturas::ActualizadoEn)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_facturas_orden_compra")
                                .from(Facturas::Table, Facturas::OrdenCompraId)
                                .to(OrdenesCompra::Table, OrdenesCompra::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_facturas_orden_compra_id")
                        .table(Facturas::Table)
                        .col(Facturas::OrdenCompraId)
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_facturas_estado")
                        .table(Facturas::Table)
                        .col(Facturas::Estado)
                        .if_not_exists()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Facturas::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum OrdenesCompra {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum Facturas {
        Table,
        Id,
        NumeroFactura,
        OrdenCompraId,
        NombreVendedor,
        EmailVendedor,
        TelefonoVendedor,
        MontoTotal,
        Moneda,
        Estado,
        FechaFactura,
        FechaVencimiento,
        FechaPago,
        Notas,
        UrlDocumento,
        CreadoEn,
        ActualizadoEn,
    }
}
